//! Route classification for the auth gate.
//!
//! Every route the server exposes is declared here with its access
//! requirement. Matching is segment-wise against the same `{param}` /
//! `{*rest}` templates the router uses, so `/coursesX` does not match a
//! `/courses` entry the way the old prefix scheme would have allowed.

use axum::http::Method;

/// Access requirement of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Admitted without identity.
    Public,
    /// Requires a verified token.
    Protected,
    /// Requires a verified token whose subject is a live admin account.
    AdminOnly,
}

/// The canonical route table. Checked in order: public entries first, then
/// admin, then explicitly protected; anything unlisted is protected by
/// default.
const ROUTE_TABLE: &[(Method, &str, Access)] = &[
    // Public surface
    (Method::GET, "/health", Access::Public),
    (Method::POST, "/register", Access::Public),
    (Method::POST, "/login", Access::Public),
    (Method::POST, "/refresh-token", Access::Public),
    (Method::POST, "/forgot-password", Access::Public),
    (Method::GET, "/validate/token", Access::Public),
    (Method::GET, "/teachers/{teacher_id}/courses", Access::Public),
    (Method::GET, "/uploads/{*path}", Access::Public),
    // Admin surface
    (Method::POST, "/ban", Access::AdminOnly),
    (Method::POST, "/offs/all", Access::AdminOnly),
    (Method::POST, "/offs/{course_id}", Access::AdminOnly),
    // Authenticated surface
    (Method::GET, "/cart", Access::Protected),
    (Method::POST, "/cart/add", Access::Protected),
    (Method::POST, "/cart/remove", Access::Protected),
    (Method::POST, "/purchase", Access::Protected),
    (Method::GET, "/user-courses/{user_id}", Access::Protected),
    (Method::POST, "/upload-course-image", Access::Protected),
    (Method::POST, "/upload-session-video", Access::Protected),
];

/// Classifies a request path (query string ignored) into its access class.
pub fn classify(method: &Method, path: &str) -> Access {
    let path = path.split('?').next().unwrap_or(path);

    ROUTE_TABLE
        .iter()
        .find(|(m, template, _)| m == method && template_matches(template, path))
        .map(|(_, _, access)| *access)
        .unwrap_or(Access::Protected)
}

/// Segment-wise template match. `{param}` matches exactly one segment; a
/// trailing `{*rest}` matches one or more remaining segments.
fn template_matches(template: &str, path: &str) -> bool {
    let template: Vec<&str> = template.split('/').filter(|s| !s.is_empty()).collect();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    for (idx, part) in template.iter().enumerate() {
        if part.starts_with("{*") {
            return segments.len() > idx;
        }
        match segments.get(idx) {
            Some(segment) => {
                if !part.starts_with('{') && segment != part {
                    return false;
                }
            }
            None => return false,
        }
    }

    template.len() == segments.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_routes_are_public() {
        assert_eq!(classify(&Method::POST, "/register"), Access::Public);
        assert_eq!(classify(&Method::POST, "/login"), Access::Public);
        assert_eq!(classify(&Method::GET, "/validate/token"), Access::Public);
        assert_eq!(
            classify(&Method::GET, "/teachers/t-123/courses"),
            Access::Public
        );
        assert_eq!(
            classify(&Method::GET, "/uploads/courses/a.png"),
            Access::Public
        );
    }

    #[test]
    fn admin_routes_are_admin_only() {
        assert_eq!(classify(&Method::POST, "/ban"), Access::AdminOnly);
        assert_eq!(classify(&Method::POST, "/offs/all"), Access::AdminOnly);
        assert_eq!(classify(&Method::POST, "/offs/c-9"), Access::AdminOnly);
    }

    #[test]
    fn unlisted_paths_default_to_protected() {
        assert_eq!(classify(&Method::GET, "/"), Access::Protected);
        assert_eq!(classify(&Method::GET, "/nowhere"), Access::Protected);
        assert_eq!(classify(&Method::DELETE, "/cart"), Access::Protected);
    }

    #[test]
    fn matching_is_segment_wise_not_prefix() {
        // The old prefix scheme would have classified these as their
        // lookalike entries; segment matching does not.
        assert_eq!(classify(&Method::GET, "/teachersX/t-1/courses"), Access::Protected);
        assert_eq!(classify(&Method::POST, "/offs/all/extra"), Access::Protected);
        assert_eq!(classify(&Method::POST, "/registerX"), Access::Protected);
    }

    #[test]
    fn params_match_exactly_one_segment() {
        assert_eq!(
            classify(&Method::GET, "/teachers/t-1/courses/extra"),
            Access::Protected
        );
        assert_eq!(classify(&Method::GET, "/teachers/courses"), Access::Protected);
    }

    #[test]
    fn query_strings_are_stripped_before_matching() {
        assert_eq!(classify(&Method::GET, "/cart?page=2"), Access::Protected);
        assert_eq!(classify(&Method::POST, "/login?redirect=/cart"), Access::Public);
    }

    #[test]
    fn method_is_part_of_the_key() {
        assert_eq!(classify(&Method::GET, "/register"), Access::Protected);
        assert_eq!(classify(&Method::POST, "/cart"), Access::Protected);
    }
}
