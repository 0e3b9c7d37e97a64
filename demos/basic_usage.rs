use artpick::corpus::art_analyzers;
use artpick::{Art, SearchConfig, SearchEngine, SelectionMode};

fn main() -> anyhow::Result<()> {
    println!("=== artpick Basic Usage Example ===\n");

    // A tiny in-code corpus; the binary loads these from .txt files instead
    let arts = vec![
        Art {
            id: 0,
            blob: " /\\_/\\\n( o.o ) a happy cat\n > ^ <".to_string(),
            tags: vec!["happy_cat.txt".to_string()],
        },
        Art {
            id: 1,
            blob: "  __\no-''|\\_____/)  a happy dog\n \\_/|_)     )".to_string(),
            tags: vec!["happy_dog.txt".to_string()],
        },
        Art {
            id: 2,
            blob: "><((('>  a fish".to_string(),
            tags: vec!["fish.txt".to_string()],
        },
    ];

    println!("Indexing {} arts...", arts.len());
    let engine = SearchEngine::build(arts.clone(), art_analyzers()?, SearchConfig::default())?;
    println!("✓ Indexed {} arts\n", engine.doc_count());

    // Example 1: a query with a single match is deterministic
    println!("--- Example 1: Search for 'fish' ---");
    if let Some(art) = engine.search_one("fish") {
        println!("{}\n", art.blob);
    }

    // Example 2: a query with several matches picks uniformly at random
    println!("--- Example 2: Search for 'happy' three times ---");
    for i in 1..=3 {
        if let Some(art) = engine.search_one("happy") {
            println!("{}. picked {:?}", i, art.tags[0]);
        }
    }
    println!();

    // Example 3: top-score mode always keeps the best match
    println!("--- Example 3: Top-score mode for 'happy dog' ---");
    let ranked = SearchEngine::build(
        arts,
        art_analyzers()?,
        SearchConfig {
            mode: SelectionMode::TopScore,
            ..SearchConfig::default()
        },
    )?;
    if let Some(art) = ranked.search_one("happy dog") {
        println!("best match: {:?}\n", art.tags[0]);
    }

    // Example 4: no match is a normal outcome, not an error
    println!("--- Example 4: Search for 'zebra' ---");
    match engine.search_one("zebra") {
        Some(art) => println!("unexpectedly found {:?}", art.tags[0]),
        None => println!("no match\n"),
    }

    // Example 5: index statistics
    println!("--- Example 5: Index stats ---");
    let stats = engine.stats();
    println!(
        "documents: {}, distinct terms: {}, postings: {}",
        stats.total_documents, stats.total_terms, stats.total_postings
    );

    Ok(())
}
