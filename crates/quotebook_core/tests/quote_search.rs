use quotebook_core::{builtin_catalog, Quote, QuoteStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn scenario_store() -> QuoteStore {
    QuoteStore::new(vec![
        Quote::new("Be bold", "A", "courage").unwrap(),
        Quote::new("Stay calm", "B", "peace").unwrap(),
    ])
}

#[test]
fn search_scenario_matches_text_case_insensitively() {
    let store = scenario_store();

    let hits = store.search("be");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0], &Quote::new("Be bold", "A", "courage").unwrap());

    assert!(store.search("z").is_empty());
}

#[test]
fn search_matches_author_and_tag() {
    let store = scenario_store();
    assert_eq!(store.search("b")[0].text, "Be bold");
    assert_eq!(store.search("calm")[0].author, "B");
    assert_eq!(store.search("PEACE")[0].text, "Stay calm");
}

#[test]
fn empty_query_returns_catalog_in_order() {
    let store = scenario_store();
    let all = store.search("");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].text, "Be bold");
    assert_eq!(all[1].text, "Stay calm");
    assert_eq!(store.search("   ").len(), 2);
}

#[test]
fn search_over_builtin_catalog_is_filtered_and_ordered() {
    let store = QuoteStore::new(builtin_catalog().unwrap());

    for query in ["you", "COURAGE", "roosevelt", "xyzzy", "a"] {
        let needle = query.to_lowercase();
        let hits = store.search(query);
        for hit in &hits {
            assert!(
                hit.text.to_lowercase().contains(&needle)
                    || hit.author.to_lowercase().contains(&needle)
                    || hit.tag.to_lowercase().contains(&needle),
                "unexpected hit {hit} for `{query}`"
            );
        }

        let positions = hits
            .iter()
            .map(|hit| store.quotes().iter().position(|quote| quote == *hit).unwrap())
            .collect::<Vec<_>>();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

        let expected = store
            .quotes()
            .iter()
            .filter(|quote| quote.matches_lowercase(&needle))
            .count();
        assert_eq!(hits.len(), expected);
    }
}

#[test]
fn random_quote_covers_catalog() {
    let store = scenario_store();
    let mut rng = StdRng::seed_from_u64(42);
    let seen = (0..64)
        .filter_map(|_| store.random_quote(&mut rng))
        .map(|quote| quote.text.clone())
        .collect::<HashSet<_>>();
    assert_eq!(seen.len(), 2);
}
