use fashion_scraper::config::Config;
use fashion_scraper::error::ScraperError;
use fashion_scraper::extract::CatalogScraper;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn card(title: &str, price: &str) -> String {
    format!(
        r#"<div class="collection-card">
            <div class="product-info">
                <h3 class="product-title">{title}</h3>
                <div class="price-container"><span class="price">{price}</span></div>
                <p style="font-size: 14px; color: #777;">Rating: &#11088; 4.1 / 5</p>
                <p style="font-size: 14px; color: #777;">3 Colors</p>
                <p style="font-size: 14px; color: #777;">Size: M</p>
                <p style="font-size: 14px; color: #777;">Gender: Men</p>
            </div>
        </div>"#
    )
}

fn page(cards: &[String]) -> String {
    format!(
        r#"<html><body><div class="collection-grid">{}</div></body></html>"#,
        cards.concat()
    )
}

fn scraper_for(server: &MockServer) -> CatalogScraper {
    let config = Config {
        base_url: server.uri(),
        ..Default::default()
    };
    CatalogScraper::new(&config).unwrap()
}

#[tokio::test]
async fn scrapes_cards_from_the_first_page() {
    let server = MockServer::start().await;
    let body = page(&[card("T-shirt 1", "$10.00"), card("T-shirt 2", "$20.50")]);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&server)
        .await;

    let products = scraper_for(&server).scrape_page(1).await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].title, "T-shirt 1");
    assert_eq!(products[0].price, "$10.00");
    assert_eq!(products[1].title, "T-shirt 2");
}

#[tokio::test]
async fn later_pages_use_the_page_suffix() {
    let server = MockServer::start().await;
    let body = page(&[card("Pants 7", "$35.25")]);

    Mock::given(method("GET"))
        .and(path("/page3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&server)
        .await;

    let products = scraper_for(&server).scrape_page(3).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Pants 7");
}

#[tokio::test]
async fn missing_page_surfaces_a_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = scraper_for(&server).scrape_page(2).await;
    match result {
        Err(ScraperError::Fetch { page, status }) => {
            assert_eq!(page, 2);
            assert_eq!(status, 404);
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_surfaces_a_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let result = scraper_for(&server).scrape_page(1).await;
    assert!(matches!(
        result,
        Err(ScraperError::Fetch { page: 1, status: 500 })
    ));
}

#[tokio::test]
async fn cardless_page_surfaces_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>down for maintenance</body></html>"))
        .mount(&server)
        .await;

    let result = scraper_for(&server).scrape_page(1).await;
    assert!(matches!(result, Err(ScraperError::Parse(_))));
}
