use pretty_assertions::assert_eq;
use serde_json::json;
use vitrine::api::decode_producers;
use vitrine::catalog::{Catalog, Producer, Rating};
use vitrine::engine::{facet_options, run_query, CommerceSort, ProducerSort, Query};

fn producers(value: serde_json::Value) -> Vec<Producer> {
    serde_json::from_value(value).unwrap()
}

fn trio() -> Catalog {
    Catalog::from_producers(producers(json!([
        {"id": 1, "display_name": "Dubois", "region": "Occitanie", "department": "Gard",
         "avg_rating": 4.5, "rating_count": 10},
        {"id": 2, "display_name": "Martin", "region": "Occitanie", "department": "Hérault",
         "avg_rating": 0, "rating_count": 0},
        {"id": 3, "display_name": "Abel", "region": "Bretagne", "department": "Finistère",
         "avg_rating": 5, "rating_count": 2}
    ])))
}

fn names<S>(catalog: &Catalog, text: &str, region: &str, sort: S) -> Vec<String>
where
    S: vitrine::engine::SortOrder<vitrine::catalog::ProducerCard>,
{
    run_query(
        &catalog.producers,
        &Query {
            text,
            region,
            departments: &[],
            sort,
            page: 1,
            page_size: 50,
        },
    )
    .items
    .into_iter()
    .map(|c| c.name)
    .collect()
}

#[test]
fn sort_by_name() {
    let catalog = trio();
    assert_eq!(
        names(&catalog, "", "", ProducerSort::Name),
        vec!["Abel", "Dubois", "Martin"]
    );
}

#[test]
fn sort_by_rating_puts_unrated_last() {
    let catalog = trio();
    assert_eq!(
        names(&catalog, "", "", ProducerSort::RatingDesc),
        vec!["Abel", "Dubois", "Martin"]
    );
    assert_eq!(
        names(&catalog, "", "", ProducerSort::RatingAsc),
        vec!["Martin", "Dubois", "Abel"]
    );
    let martin = catalog.producers.iter().find(|c| c.name == "Martin").unwrap();
    assert_eq!(martin.rating, Rating::Unrated);
}

#[test]
fn department_options_follow_the_region() {
    let catalog = trio();
    let options = facet_options(&catalog.producers, "Occitanie");
    assert_eq!(options.departments, vec!["Gard", "Hérault"]);
    assert_eq!(options.regions, vec!["Bretagne", "Occitanie"]);
}

#[test]
fn query_matches_name_substring_case_insensitively() {
    let catalog = trio();
    assert_eq!(names(&catalog, "dub", "", ProducerSort::Name), vec!["Dubois"]);
    assert_eq!(names(&catalog, "DUB", "", ProducerSort::Name), vec!["Dubois"]);
    assert_eq!(names(&catalog, "  ", "", ProducerSort::Name).len(), 3);
}

#[test]
fn accents_are_ignored_in_search_and_region() {
    let catalog = trio();
    assert_eq!(names(&catalog, "herault", "", ProducerSort::Name), vec!["Martin"]);
    assert_eq!(
        names(&catalog, "", "occitanie", ProducerSort::Name),
        vec!["Dubois", "Martin"]
    );
}

#[test]
fn out_of_range_page_is_clamped() {
    let catalog = Catalog::from_producers(producers(json!([
        {"id": 1, "display_name": "A"}, {"id": 2, "display_name": "B"},
        {"id": 3, "display_name": "C"}, {"id": 4, "display_name": "D"},
        {"id": 5, "display_name": "E"}
    ])));
    let result = run_query(
        &catalog.producers,
        &Query {
            text: "",
            region: "",
            departments: &[],
            sort: ProducerSort::Name,
            page: 10,
            page_size: 2,
        },
    );
    assert_eq!(result.page.page, 3);
    assert_eq!(result.page.total_pages, 3);
    let names: Vec<_> = result.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["E"]);
}

#[test]
fn location_falls_back_to_the_first_active_commerce() {
    let catalog = Catalog::from_producers(producers(json!([{
        "id": 9,
        "first_name": "Jeanne",
        "last_name": "Roux",
        "commerces": [
            {"id": 1, "name": "Fermé", "is_active": false, "region": "Normandie"},
            {"id": 2, "name": "Marché", "address": {
                "street": "rue du Port",
                "city": {"name": "Sète", "postal_code": "34200",
                         "department": {"name": "Hérault", "region": {"name": "Occitanie"}}}
            }}
        ]
    }])));
    let card = &catalog.producers[0];
    assert_eq!(card.name, "Jeanne Roux");
    assert_eq!(card.region, "Occitanie");
    assert_eq!(card.department, "Hérault");
    assert_eq!(card.city, "Sète");
    assert_eq!(card.commerce_count, 1);

    assert_eq!(catalog.commerces.len(), 1);
    let row = &catalog.commerces[0];
    assert_eq!(row.name, "Marché");
    assert_eq!(row.producer_name, "Jeanne Roux");
    assert_eq!(row.key, "9-2");
}

#[test]
fn commerce_view_sorts_by_producer_then_name() {
    let catalog = Catalog::from_producers(producers(json!([
        {"id": 1, "display_name": "Zola", "commerces": [{"id": 1, "name": "Boutique"}]},
        {"id": 2, "display_name": "Abel", "commerces": [
            {"id": 1, "name": "Marché"}, {"id": 2, "name": "Atelier"}
        ]}
    ])));
    let result = run_query(
        &catalog.commerces,
        &Query {
            text: "",
            region: "",
            departments: &[],
            sort: CommerceSort::Producer,
            page: 1,
            page_size: 10,
        },
    );
    let names: Vec<_> = result.items.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Atelier", "Marché", "Boutique"]);
}

#[test]
fn decoded_payload_feeds_the_catalog() {
    let body = r#"{"results": [
        {"id": "p1", "displayName": "Ferme du Lac", "rating": "4,5", "ratingCount": "3",
         "companies": [{"id": 1, "companyName": "Le Lac", "certifications": ["AB", {"code": "LR", "label": "Label Rouge"}]}]},
        "not a producer"
    ]}"#;
    let catalog = Catalog::from_producers(decode_producers(body).unwrap());
    assert_eq!(catalog.producers.len(), 1);
    let card = &catalog.producers[0];
    assert_eq!(card.rating, Rating::Rated { average: 4.5, count: 3 });
    let certs: Vec<_> = catalog.commerces[0]
        .certifications()
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(certs, vec!["AB", "Label Rouge"]);
}

fn sorted(catalog: &Catalog, sort: ProducerSort) -> Vec<String> {
    names(catalog, "", "", sort)
}

#[test]
fn recent_puts_missing_and_unparsable_dates_last() {
    let catalog = Catalog::from_producers(producers(json!([
        {"id": 1, "display_name": "A", "date_joined": "2024-05-01T08:00:00Z"},
        {"id": 2, "display_name": "Bergerie"},
        {"id": 3, "display_name": "C", "date_joined": "2025-01-01"},
        {"id": 4, "display_name": "D", "date_joined": "hier"}
    ])));
    assert_eq!(sorted(&catalog, ProducerSort::Recent), vec!["C", "A", "Bergerie", "D"]);
}

#[test]
fn commerces_counts_only_active_ones_then_breaks_ties_by_name() {
    let catalog = Catalog::from_producers(producers(json!([
        {"id": 1, "display_name": "Alpha", "commerces": [{"id": 1}, {"id": 2, "is_active": false}]},
        {"id": 2, "display_name": "Bergerie"},
        {"id": 3, "display_name": "Zoé", "commerces": [{"id": 1}, {"id": 2}]},
        {"id": 4, "display_name": "Abri", "commerces": [{"id": 1}]}
    ])));
    assert_eq!(
        sorted(&catalog, ProducerSort::Commerces),
        vec!["Zoé", "Abri", "Alpha", "Bergerie"]
    );
}

#[test]
fn unknown_region_and_department_sort_after_named_values() {
    let catalog = Catalog::from_producers(producers(json!([
        {"id": 1, "display_name": "A", "region": "Occitanie", "department": "Gard"},
        {"id": 2, "display_name": "Bergerie"},
        {"id": 3, "display_name": "C", "region": "Bretagne", "department": "Finistère"}
    ])));
    assert_eq!(sorted(&catalog, ProducerSort::Region), vec!["C", "A", "Bergerie"]);
    assert_eq!(sorted(&catalog, ProducerSort::Department), vec!["C", "A", "Bergerie"]);
}

#[test]
fn commerce_rows_match_through_the_producer_name() {
    let catalog = Catalog::from_producers(producers(json!([
        {"id": 1, "display_name": "Bergerie des Causses",
         "commerces": [{"id": 1, "name": "Marché du samedi"}]},
        {"id": 2, "display_name": "Bergerie Vide"},
        {"id": 3, "display_name": "Dubois", "commerces": [{"id": 1, "name": "Cave Dubois"}]}
    ])));
    let result = run_query(
        &catalog.commerces,
        &Query {
            text: "berg",
            region: "",
            departments: &[],
            sort: CommerceSort::Name,
            page: 1,
            page_size: 10,
        },
    );
    let names: Vec<_> = result.items.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Marché du samedi"]);
}
