use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::{Duration, Instant};
use vitrine::catalog::{Catalog, Producer};
use vitrine::engine::{CommerceSort, ProducerSort};
use vitrine::view::{derive_view, ViewController, ViewEvent, ViewMode, ViewState};

const DEBOUNCE: Duration = Duration::from_millis(250);

fn catalog() -> Catalog {
    let producers: Vec<Producer> = serde_json::from_value(json!([
        {"id": 1, "display_name": "Dubois", "region": "Occitanie", "department": "Gard",
         "commerces": [{"id": 1, "name": "Cave Dubois"}]},
        {"id": 2, "display_name": "Martin", "region": "Occitanie", "department": "Hérault",
         "commerces": [{"id": 1, "name": "Halle Martin", "region": "Occitanie", "department": "Hérault"}]},
        {"id": 3, "display_name": "Abel", "region": "Bretagne", "department": "Finistère"},
        {"id": 4, "display_name": "Bernard", "region": "Bretagne", "department": "Morbihan"},
        {"id": 5, "display_name": "Caron", "region": "Occitanie", "department": "Gard"}
    ]))
    .unwrap();
    Catalog::from_producers(producers)
}

fn controller(page_size: usize) -> ViewController {
    let mut c = ViewController::new(page_size, DEBOUNCE);
    c.set_catalog(catalog());
    c.set_producer_sort(ProducerSort::Name);
    c.take_events();
    c
}

fn names(c: &ViewController) -> Vec<String> {
    c.view().items.names().into_iter().map(String::from).collect()
}

#[test]
fn region_change_prunes_only_invalid_departments() {
    let mut c = controller(50);
    assert!(c.toggle_department("Gard"));
    assert!(c.toggle_department("finistere"));
    assert_eq!(c.state().departments, vec!["Gard", "Finistère"]);

    assert!(c.set_region("Occitanie"));
    assert_eq!(c.state().departments, vec!["Gard"]);
    assert_eq!(c.view().facets.departments, vec!["Gard", "Hérault"]);
    assert_eq!(names(&c), vec!["Caron", "Dubois"]);
}

#[test]
fn unknown_facet_values_are_rejected() {
    let mut c = controller(50);
    assert!(!c.set_region("Atlantide"));
    assert_eq!(c.state().region, "");
    assert!(c.set_region("occitanie"));
    assert_eq!(c.state().region, "Occitanie");
    assert!(!c.toggle_department("Finistère"));
}

#[test]
fn mode_switch_resets_facets_and_keeps_query() {
    let mut c = controller(2);
    let now = Instant::now();
    c.set_query_text("o", now);
    c.flush_query();
    c.set_region("Occitanie");
    c.toggle_department("Gard");
    c.next_page();

    c.set_view_mode(ViewMode::Commerces);
    let state = c.state();
    assert_eq!(state.mode, ViewMode::Commerces);
    assert_eq!(state.query, "o");
    assert_eq!(state.region, "");
    assert!(state.departments.is_empty());
    assert_eq!(state.page, 1);
    assert_eq!(state.producer_sort, ProducerSort::default());
    assert_eq!(state.commerce_sort, CommerceSort::Name);
    assert_eq!(names(&c), vec!["Cave Dubois", "Halle Martin"]);
}

#[test]
fn filter_changes_go_back_to_page_one() {
    let mut c = controller(2);
    c.set_page(2);
    assert_eq!(c.view().page.page, 2);
    c.cycle_sort(true);
    assert_eq!(c.view().page.page, 1);

    c.set_page(3);
    c.set_region("Bretagne");
    assert_eq!(c.view().page.page, 1);
    assert_eq!(names(&c), vec!["Abel", "Bernard"]);
}

#[test]
fn page_is_clamped_and_reported() {
    let mut c = controller(2);
    c.set_page(10);
    assert_eq!(c.view().page.page, 3);
    assert_eq!(c.state().page, 3);
    assert_eq!(names(&c), vec!["Martin"]);
    assert_eq!(c.take_events(), vec![ViewEvent::PageChanged { page: 3 }]);

    c.set_page(3);
    assert!(c.take_events().is_empty());

    c.next_page();
    assert_eq!(c.view().page.page, 3);
    c.prev_page();
    assert_eq!(c.take_events(), vec![ViewEvent::PageChanged { page: 2 }]);
}

#[test]
fn shrinking_catalog_clamps_the_page() {
    let mut c = controller(2);
    c.set_page(3);
    c.take_events();
    let small: Vec<Producer> = serde_json::from_value(json!([{"id": 9, "display_name": "Seul"}])).unwrap();
    c.set_catalog(Catalog::from_producers(small));
    assert_eq!(c.view().page.page, 1);
    assert_eq!(c.take_events(), vec![ViewEvent::PageChanged { page: 1 }]);
}

#[test]
fn query_is_debounced() {
    let mut c = controller(50);
    let t0 = Instant::now();
    c.set_query_text("d", t0);
    c.set_query_text("du", t0 + Duration::from_millis(100));
    assert!(!c.tick(t0 + Duration::from_millis(300)));
    assert_eq!(c.state().query, "");
    assert_eq!(c.raw_query(), "du");

    assert!(c.tick(t0 + Duration::from_millis(360)));
    assert_eq!(c.state().query, "du");
    assert_eq!(names(&c), vec!["Dubois"]);
    assert!(!c.tick(t0 + Duration::from_secs(5)));
}

#[test]
fn clear_filters_keeps_sort_and_mode() {
    let mut c = controller(50);
    c.set_query_text("zzz", Instant::now());
    c.flush_query();
    c.set_region("Bretagne");
    c.set_producer_sort(ProducerSort::RatingDesc);
    assert!(c.view().items.is_empty());

    c.clear_filters();
    assert_eq!(c.view().total_filtered(), 5);
    assert_eq!(c.state().producer_sort, ProducerSort::RatingDesc);
    assert_eq!(c.raw_query(), "");
}

#[test]
fn sort_by_name_is_mode_aware() {
    let mut c = controller(50);
    assert!(c.set_sort_by_name("commerces").is_ok());
    assert!(c.set_sort_by_name("producer").is_err());
    c.set_view_mode(ViewMode::Commerces);
    assert!(c.set_sort_by_name("producer").is_ok());
    assert_eq!(c.view().sort_key, "producer");
}

#[test]
fn derive_view_is_pure() {
    let catalog = catalog();
    let state = ViewState {
        region: "Occitanie".to_string(),
        producer_sort: ProducerSort::Name,
        ..ViewState::default()
    };
    let a = derive_view(&catalog, &state, 2);
    let b = derive_view(&catalog, &state, 2);
    assert_eq!(a.items.keys(), b.items.keys());
    assert_eq!(a.page, b.page);
    assert_eq!(a.total_filtered(), 3);
    assert!(derive_view(&Catalog::default(), &state, 2).items.is_empty());
}

fn spelled_variants() -> ViewController {
    let producers: Vec<Producer> = serde_json::from_value(json!([
        {"id": 1, "display_name": "Dubois", "region": "OCCITANIE", "department": "Gard"},
        {"id": 2, "display_name": "Martin", "region": "Occitanie", "department": "gard"},
        {"id": 3, "display_name": "Abel", "region": "Pays de la Loire", "department": "Sarthe"}
    ]))
    .unwrap();
    let mut c = ViewController::new(50, DEBOUNCE);
    c.set_catalog(Catalog::from_producers(producers));
    c
}

#[test]
fn spelling_variants_collapse_into_one_option() {
    let c = spelled_variants();
    assert_eq!(c.view().facets.regions, vec!["OCCITANIE", "Pays de la Loire"]);
    assert_eq!(c.view().facets.departments, vec!["Gard", "Sarthe"]);
}

#[test]
fn region_cycle_visits_every_option_and_wraps() {
    let mut c = spelled_variants();
    let mut seen = Vec::new();
    for _ in 0..3 {
        c.cycle_region(true);
        seen.push(c.state().region.clone());
    }
    assert_eq!(seen, vec!["OCCITANIE", "Pays de la Loire", ""]);

    c.cycle_region(false);
    assert_eq!(c.state().region, "Pays de la Loire");
}

#[test]
fn toggling_a_variant_spelling_toggles_the_shared_option() {
    let mut c = spelled_variants();
    assert!(c.toggle_department("gard"));
    assert_eq!(c.state().departments, vec!["Gard"]);
    assert_eq!(c.view().total_filtered(), 2);
    assert!(c.toggle_department("GARD"));
    assert!(c.state().departments.is_empty());
}
