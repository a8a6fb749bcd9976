/// An open-science curriculum (Q100) by an organization (Q200) with three
/// modules listed out of order (ordinals 2, 1, 3). Each module points back
/// to the curriculum through `part-of`, and all share one author (Q300).
pub const CURRICULUM: &str = r#"
@prefix wd: <http://www.wikidata.org/entity/> .
@prefix wdt: <http://www.wikidata.org/prop/direct/> .
@prefix p: <http://www.wikidata.org/prop/> .
@prefix ps: <http://www.wikidata.org/prop/statement/> .
@prefix pq: <http://www.wikidata.org/prop/qualifier/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix hub: <https://w3id.org/resource-hub/class/> .

wd:Q100 rdfs:label "Open Science Curriculum"@en ;
    wdt:P31 hub:Curriculum ;
    wdt:P50 wd:Q200 ;
    wdt:P973 "https://seekcommons.org/curriculum" ;
    p:P527 [ ps:P527 wd:Q102 ; pq:P1545 "2" ] ;
    p:P527 [ ps:P527 wd:Q101 ; pq:P1545 "1" ] ;
    p:P527 [ ps:P527 wd:Q103 ; pq:P1545 "3" ] .

wd:Q101 rdfs:label "What is open science?"@en ;
    wdt:P31 hub:Module ;
    wdt:P50 wd:Q300 ;
    wdt:P361 wd:Q100 .

wd:Q102 rdfs:label "Open data"@en ;
    wdt:P31 hub:Module ;
    wdt:P50 wd:Q300 ;
    wdt:P361 wd:Q100 .

wd:Q103 rdfs:label "Open hardware"@en ;
    wdt:P31 hub:Module ;
    wdt:P50 wd:Q300 ;
    wdt:P361 wd:Q100 ;
    wdt:P577 "2023-09-01T00:00:00Z"^^<http://www.w3.org/2001/XMLSchema#dateTime> .

wd:Q200 rdfs:label "SEEKCommons"@en ;
    wdt:P31 wd:Q43229 ;
    wdt:P856 <https://seekcommons.org/> .

wd:Q300 rdfs:label "A. Researcher"@en ;
    wdt:P31 wd:Q5 ;
    wdt:P496 "0000-0002-1825-0097" .
"#;
