use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::api::ApiResponse;
use crate::shared::pagination::{Page, PageRequest};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number, 20 items per page
    #[param(example = "2")]
    pub page: Option<String>,
}

impl PageQuery {
    pub fn request(&self) -> Option<PageRequest> {
        PageRequest::parse(self.page.as_deref())
    }
}

/// One page of a list endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(bound = "T: Serialize")]
pub struct PageDto<T> {
    /// Items across all pages
    #[schema(example = 42)]
    pub count: u64,
    #[schema(example = "http://localhost:8000/api/cvs?page=3")]
    pub next: Option<String>,
    #[schema(example = "http://localhost:8000/api/cvs")]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T: Serialize> PageDto<T> {
    pub fn new(req: &HttpRequest, page: Page<T>) -> Self {
        Self {
            count: page.total,
            next: page
                .has_next()
                .then(|| page_link(req, page.number() + 1)),
            previous: page
                .has_previous()
                .then(|| page_link(req, page.number() - 1)),
            results: page.items,
        }
    }
}

/// Absolute link to another page of the current endpoint. Page 1 carries no
/// `page` parameter.
fn page_link(req: &HttpRequest, number: u64) -> String {
    let info = req.connection_info();
    let base = format!("{}://{}{}", info.scheme(), info.host(), req.path());
    if number <= 1 {
        base
    } else {
        format!("{base}?page={number}")
    }
}

pub fn invalid_page() -> HttpResponse {
    ApiResponse::not_found("INVALID_PAGE", "Invalid page.")
}

/// 200 with the page, or 404 when the page lies past the end.
pub fn paginated<T: Serialize>(req: &HttpRequest, page: Page<T>) -> HttpResponse {
    if page.is_out_of_range() {
        return invalid_page();
    }
    ApiResponse::success(PageDto::new(req, page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::test::TestRequest;

    fn request() -> HttpRequest {
        TestRequest::get()
            .uri("/api/skills?page=2")
            .insert_header(("host", "cv.example.com"))
            .to_http_request()
    }

    #[test]
    fn links_point_at_neighbouring_pages() {
        let page = Page::from_all((0..45).collect::<Vec<u32>>(), PageRequest::new(2).unwrap());

        let dto = PageDto::new(&request(), page);

        assert_eq!(dto.count, 45);
        assert_eq!(dto.results.len(), 20);
        assert_eq!(dto.next.as_deref(), Some("http://cv.example.com/api/skills?page=3"));
        assert_eq!(dto.previous.as_deref(), Some("http://cv.example.com/api/skills"));
    }

    #[test]
    fn single_page_has_no_links() {
        let dto = PageDto::new(&request(), Page::from_all(vec![1, 2], PageRequest::first()));

        assert!(dto.next.is_none());
        assert!(dto.previous.is_none());
    }

    #[actix_web::test]
    async fn page_past_the_end_is_404() {
        let resp = paginated(&request(), Page::from_all(vec![1, 2], PageRequest::new(2).unwrap()));
        assert_eq!(resp.status(), 404);

        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "INVALID_PAGE");
    }
}
