//! Endpoint groups of the backend API, one per resource.

pub mod blog;
pub mod contact;
pub mod forum;
pub mod inquiries;
pub mod orders;
pub mod portfolio;
pub mod projects;
pub mod services;
pub mod users;

pub use blog::Blog;
pub use contact::Contact;
pub use forum::Forum;
pub use inquiries::Inquiries;
pub use orders::Orders;
pub use portfolio::PortfolioItems;
pub use projects::Projects;
pub use services::Services;
pub use users::Users;

use url::form_urlencoded;

/// Percent-encode `value` as a single path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Append the set parameters as a form-urlencoded query string.
/// With nothing set the path is returned unchanged, without a `?`.
pub(crate) fn with_query(path: &str, params: &[(&str, Option<String>)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut empty = true;

    for (name, value) in params {
        if let Some(value) = value {
            serializer.append_pair(name, value);
            empty = false;
        }
    }

    if empty {
        path.to_string()
    } else {
        format!("{}?{}", path, serializer.finish())
    }
}
