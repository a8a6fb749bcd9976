//! Demonstrates loading the built-in shapes and serializing them.
//!
//! Run with: `cargo run --example dump_shapes -p hub-schema`

fn main() {
    let registry = match hub_schema::SchemaRegistry::builtin() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("built-in shapes failed to register: {e}");
            std::process::exit(1);
        }
    };

    println!("Resource Hub shapes: {} kinds", registry.len());
    println!("  Vocabulary: {} mapped properties", registry.vocabulary().len());
    println!();

    for shape in registry.shapes() {
        let required = shape
            .properties
            .iter()
            .filter(|c| c.cardinality.is_required())
            .count();
        println!(
            "  {:18} {:45} {:>2} properties, {:>2} required, {:>2} relations",
            shape.kind,
            shape.class,
            shape.properties.len(),
            required,
            shape.relations().count(),
        );
    }

    println!();

    let shexc = hub_schema::serializer::shexc::to_shexc(&registry);
    println!("ShExC output ({} bytes):", shexc.len());
    let preview_end = shexc
        .char_indices()
        .nth(400)
        .map_or(shexc.len(), |(i, _)| i);
    println!("{}...", &shexc[..preview_end]);
}
