/// A grant (Q400) from an organization (Q200) with a malformed award id. It
/// funds a research project (Q500) that points back at it and produced a
/// case study (Q600).
///
/// `P99001` (award id), `P99002` (funds) and `P99003` (funded by) stand in
/// for deployment-configured properties.
pub const FUNDING: &str = r#"
@prefix wd: <http://www.wikidata.org/entity/> .
@prefix wdt: <http://www.wikidata.org/prop/direct/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

wd:Q400 rdfs:label "Open hardware for science"@en ;
    wdt:P31 wd:Q230788 ;
    wdt:P8324 wd:Q200 ;
    wdt:P1476 "Open hardware for science"@en ;
    wdt:P99001 "12345" ;
    wdt:P99002 wd:Q500 .

wd:Q500 rdfs:label "Low-cost microscopy"@en ;
    wdt:P31 wd:Q1298668 ;
    wdt:P580 "+2022-01-00T00:00:00Z" ;
    wdt:P8324 wd:Q200 ;
    wdt:P99003 wd:Q400 ;
    wdt:P527 wd:Q600 .

wd:Q600 rdfs:label "Microscopy case study"@en ;
    wdt:P31 wd:Q732557 ;
    wdt:P953 <https://example.org/case-study.pdf> ;
    wdt:P361 wd:Q500 .

wd:Q200 rdfs:label "SEEKCommons"@en ;
    wdt:P31 wd:Q43229 .
"#;
