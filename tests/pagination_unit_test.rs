//! Unit tests for page numbers and pagination links.
//!
//! Run with: cargo test --test pagination_unit_test

use bikeshare_api::query::{InvalidPage, PageLinks, PageNumber, QueryParams, total_pages};

fn page_param(value: &str) -> Result<PageNumber, InvalidPage> {
    let params: QueryParams = [("page", value)].into_iter().collect();
    PageNumber::from_params(&params)
}

#[test]
fn page_defaults_to_first() {
    assert_eq!(
        PageNumber::from_params(&QueryParams::default()),
        Ok(PageNumber::FIRST)
    );
    assert_eq!(page_param("").map(PageNumber::get), Ok(1));
    assert_eq!(page_param("3").map(PageNumber::get), Ok(3));
    assert_eq!(page_param("3").map(PageNumber::index), Ok(2));
}

#[test]
fn non_positive_or_non_numeric_pages_are_invalid() {
    for raw in ["0", "-1", "two", "1.5"] {
        assert_eq!(page_param(raw), Err(InvalidPage), "page={raw}");
    }
    assert_eq!(InvalidPage.to_string(), "Invalid page.");
}

#[test]
fn empty_collections_still_have_one_page() {
    assert_eq!(total_pages(0, 10), 1);
    assert_eq!(total_pages(10, 10), 1);
    assert_eq!(total_pages(11, 10), 2);
    assert_eq!(total_pages(21, 10), 3);
}

#[test]
fn first_page_link_drops_the_page_parameter() {
    let links = PageLinks::new("http://testserver/api/trips", Some("page=2"));
    let page = links.page(page_param("2").unwrap(), 21, 10, Vec::new());

    assert_eq!(page.count, 21);
    assert_eq!(page.previous.as_deref(), Some("http://testserver/api/trips"));
    assert_eq!(
        page.next.as_deref(),
        Some("http://testserver/api/trips?page=3")
    );
}

#[test]
fn boundary_pages_have_null_links() {
    let links = PageLinks::new("http://testserver/api/trips", None);

    let first = links.page(PageNumber::FIRST, 21, 10, Vec::new());
    assert!(first.previous.is_none());
    assert_eq!(
        first.next.as_deref(),
        Some("http://testserver/api/trips?page=2")
    );

    let last = links.page(page_param("3").unwrap(), 21, 10, Vec::new());
    assert!(last.next.is_none());

    let only = links.page(PageNumber::FIRST, 4, 10, Vec::new());
    assert!(only.next.is_none());
    assert!(only.previous.is_none());
}

#[test]
fn other_parameters_are_carried_sorted_by_name() {
    let links = PageLinks::new(
        "http://testserver/api/stations",
        Some("page=3&capacity_gt=18&fields=name,capacity&ordering=-capacity"),
    );

    assert_eq!(
        links.url_for(2),
        "http://testserver/api/stations?capacity_gt=18&fields=name,capacity&ordering=-capacity&page=2"
    );
    assert_eq!(
        links.url_for(1),
        "http://testserver/api/stations?capacity_gt=18&fields=name,capacity&ordering=-capacity"
    );
}
