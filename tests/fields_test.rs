//! Integration tests for field resolution through the public API.

use query_fields::{
    AllowedField, AppError, FieldError, FieldInput, FieldResolver, NamingConfig, QueryStringFields, RequestedFields,
    SelectQuery, TableNameStrategy,
};
use serde_json::json;

fn posts_allow_list() -> Vec<FieldInput> {
    vec!["id".into(), AllowedField::aliased("title", ["headline"]).into()]
}

fn resolver_for(query: &str, config: NamingConfig) -> FieldResolver<SelectQuery> {
    let pairs = query.split('&').filter(|p| !p.is_empty()).filter_map(|p| p.split_once('='));
    let request = QueryStringFields::from_pairs(pairs);
    FieldResolver::new(&request, "posts", SelectQuery::new("posts"), config)
}

// === Base table selection ===

mod base_selection {
    use super::*;

    #[test]
    fn requested_alias_selects_internal_column() {
        let mut resolver = resolver_for("fields=title", NamingConfig::default());
        resolver.allowed_fields(posts_allow_list()).unwrap();
        assert_eq!(resolver.executor().columns(), ["posts.headline"]);
        assert_eq!(
            resolver.into_executor().to_sql(),
            "SELECT \"posts\".\"headline\" FROM \"posts\""
        );
    }

    #[test]
    fn nothing_requested_selects_every_allowed_field() {
        let mut resolver = resolver_for("", NamingConfig::default());
        resolver.allowed_fields(posts_allow_list()).unwrap();
        assert_eq!(resolver.executor().columns(), ["posts.id", "posts.headline"]);
    }

    #[test]
    fn table_keyed_bucket_counts_as_base_table() {
        let mut resolver = resolver_for("fields[posts]=id", NamingConfig::default());
        resolver.allowed_fields(posts_allow_list()).unwrap();
        assert_eq!(resolver.executor().columns(), ["posts.id"]);
    }

    #[test]
    fn unknown_fields_are_all_reported() {
        let mut resolver = resolver_for("fields=id,bogus,secret", NamingConfig::default());
        let err = resolver.allowed_fields(["id"]).err().unwrap();
        assert_eq!(
            err,
            FieldError::InvalidFieldQuery {
                unknown: vec!["bogus".into(), "secret".into()],
                allowed: vec!["id".into()],
            }
        );
        assert_eq!(AppError::from(err).status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn snake_case_config_applies_to_internal_names() {
        let config = NamingConfig {
            convert_field_names_to_snake_case: true,
            ..NamingConfig::default()
        };
        let mut resolver = resolver_for("fields=publishedAt", config);
        resolver.allowed_fields(["id", "publishedAt"]).unwrap();
        assert_eq!(resolver.executor().columns(), ["posts.published_at"]);
    }

    #[test]
    fn existing_selection_is_kept() {
        let mut query = SelectQuery::new("posts");
        query_fields::QueryExecutor::select_columns(&mut query, vec!["posts.author_id".into()]);
        let request = QueryStringFields::from_pairs([("fields", "id")]);
        let mut resolver = FieldResolver::new(&request, &query.clone(), query, NamingConfig::default());
        resolver.allowed_fields(["id"]).unwrap();
        assert_eq!(resolver.executor().columns(), ["posts.author_id", "posts.id"]);
    }
}

// === Related table resolution ===

mod related_tables {
    use super::*;

    #[test]
    fn relation_name_is_pluralized() {
        let mut resolver = resolver_for("fields[authors]=name", NamingConfig::default());
        resolver.allowed_fields(posts_allow_list()).unwrap();
        assert_eq!(resolver.requested_fields_for_related_table("author", None).unwrap(), vec!["name"]);
        assert_eq!(
            resolver.requested_fields_for_related_table("author", Some("authors")).unwrap(),
            vec!["authors.name"]
        );
    }

    #[test]
    fn absent_relation_is_empty() {
        let mut resolver = resolver_for("fields=id", NamingConfig::default());
        resolver.allowed_fields(posts_allow_list()).unwrap();
        assert!(resolver.requested_fields_for_related_table("author", None).unwrap().is_empty());
    }

    #[test]
    fn relation_fields_before_allow_list_fail() {
        let resolver = resolver_for("fields[authors]=name", NamingConfig::default());
        assert!(resolver.allowed().is_none());
        assert!(matches!(
            resolver.requested_fields_for_related_table("author", None),
            Err(FieldError::UnknownIncludedFieldsQuery { fields }) if fields == vec!["name".to_string()]
        ));
    }

    #[test]
    fn dotted_request_targets_relation_bucket() {
        let config = NamingConfig {
            convert_relation_names_to_snake_case_plural: false,
            ..NamingConfig::default()
        };
        let mut resolver = resolver_for("fields=id,author.name", config);
        resolver.allowed_fields(posts_allow_list()).unwrap();
        assert_eq!(resolver.executor().columns(), ["posts.id"]);
        assert_eq!(resolver.requested_fields_for_related_table("author", None).unwrap(), vec!["name"]);
    }

    #[test]
    fn camel_case_table_strategy_matches_explicit_table() {
        let config: NamingConfig = serde_json::from_value(json!({
            "convert_relation_names_to_snake_case_plural": false,
            "convert_relation_table_name_strategy": "camelCase"
        }))
        .unwrap();
        assert_eq!(config.convert_relation_table_name_strategy, Some(TableNameStrategy::CamelCase));
        let mut resolver = resolver_for("fields[blogCategories]=name", config);
        resolver.allowed_fields(posts_allow_list()).unwrap();
        assert_eq!(
            resolver
                .requested_fields_for_related_table("category", Some("blog_categories"))
                .unwrap(),
            vec!["blog_categories.name"]
        );
    }

    #[test]
    fn includes_lock_field_registration() {
        let mut resolver = resolver_for("", NamingConfig::default());
        resolver.allowed_includes(["author", "comments"]);
        assert_eq!(resolver.allowed_fields(["id"]).err(), Some(FieldError::OrderingViolation));
    }
}

// === HTTP extraction ===

mod extraction {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;
    use query_fields::RequestFieldParser;

    #[tokio::test]
    async fn extracts_fields_from_query_string() {
        let (mut parts, _) = Request::builder()
            .uri("/posts?fields=id,title&fields%5Bauthors%5D=name&include=author")
            .body(())
            .unwrap()
            .into_parts();
        let extracted = RequestedFields::from_request_parts(&mut parts, &()).await.unwrap();
        let fields = extracted.fields();
        assert_eq!(fields.get("_"), Some(&["id".to_string(), "title".to_string()][..]));
        assert_eq!(fields.get("authors"), Some(&["name".to_string()][..]));

        let mut resolver = FieldResolver::new(&extracted, "posts", SelectQuery::new("posts"), NamingConfig::default());
        resolver.allowed_fields(posts_allow_list()).unwrap();
        assert_eq!(resolver.executor().columns(), ["posts.id", "posts.headline"]);
    }

    #[tokio::test]
    async fn no_query_string_means_no_fields() {
        let (mut parts, _) = Request::builder().uri("/posts").body(()).unwrap().into_parts();
        let extracted = RequestedFields::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(extracted.fields().is_empty());
    }
}
