//! Permission store integration tests
//!
//! Covers row creation and uniqueness, wildcard resolution, the auto-create
//! policy, listing order and display names, all through a system wired to
//! the in-memory backend.

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use permkit::{ModelRef, PermBackend, PermError, PermId, PermKey, PermKind, PermsConfig};

    use crate::common::{TestSystem, seed_directory};

    fn article_key(codename: &str) -> PermKey {
        PermKey::model(ModelRef::new("articles", "Article"), codename)
    }

    // ==================== Creation and Uniqueness ====================

    /// Test that repeated get_or_create returns the same row
    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let fixture = TestSystem::new();
        let store = fixture.system.store();

        let first = store.get_or_create(&article_key("add")).await.unwrap();
        let second = store.get_or_create(&article_key("add")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    /// Test that racing creators of one key converge on a single row
    #[tokio::test]
    async fn test_concurrent_get_or_create_converges() {
        let fixture = TestSystem::new();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let system = fixture.system.clone();
            handles.push(tokio::spawn(async move {
                system
                    .store()
                    .get_or_create(&article_key("add"))
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids: HashSet<PermId> = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        assert_eq!(ids.len(), 1);
        assert_eq!(fixture.system.store().list().await.unwrap().len(), 1);
    }

    /// Test that creating a key twice reports a conflict
    #[tokio::test]
    async fn test_create_from_key_rejects_duplicates() {
        let fixture = TestSystem::new();
        let store = fixture.system.store();

        store
            .create_from_key("model.articles.Article.add", None)
            .await
            .unwrap();
        let err = store
            .create_from_key("model.articles.Article.add", None)
            .await
            .unwrap_err();

        assert!(matches!(err, PermError::Conflict(_)));
    }

    /// Test that batch creation stops at the first failure
    #[tokio::test]
    async fn test_create_from_keys_fails_fast() {
        let fixture = TestSystem::new();
        let store = fixture.system.store();

        let err = store
            .create_from_keys(
                &[
                    "model.articles.Article.add",
                    "model.articles.Article.change",
                    "model.articles.Article.add",
                ],
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PermError::Conflict(_)));
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    // ==================== Wildcard Resolution ====================

    /// Test that an exact row wins over the scope wildcard
    #[tokio::test]
    async fn test_resolution_prefers_exact_row() {
        let fixture = TestSystem::new();
        let store = fixture.system.store();

        let wildcard = store
            .create_from_key("model.articles.Article.*", None)
            .await
            .unwrap();
        let add = store
            .create_from_key("model.articles.Article.add", None)
            .await
            .unwrap();

        let resolved = store.resolve_with_wildcard(&article_key("add")).await.unwrap();
        assert_eq!(resolved.id, add.id);

        let resolved = store
            .resolve_with_wildcard(&article_key("change"))
            .await
            .unwrap();
        assert_eq!(resolved.id, wildcard.id);
    }

    /// Test that the wildcard only answers for its own scope
    #[tokio::test]
    async fn test_wildcard_stays_within_scope() {
        let fixture = TestSystem::new();
        let store = fixture.system.store();

        store
            .create_from_key("model.articles.Article.*", None)
            .await
            .unwrap();

        let other = PermKey::model(ModelRef::new("shop", "Order"), "add");
        let err = store.resolve_with_wildcard(&other).await.unwrap_err();
        assert!(matches!(err, PermError::NotFound(_)));

        let field = PermKey::field(ModelRef::new("articles", "Article"), "title", "add");
        let err = store.resolve_with_wildcard(&field).await.unwrap_err();
        assert!(matches!(err, PermError::NotFound(_)));
    }

    /// Test that lookups never create rows
    #[tokio::test]
    async fn test_lookups_never_create_rows() {
        let fixture = TestSystem::new();
        let store = fixture.system.store();

        let err = store.resolve_with_wildcard(&article_key("add")).await.unwrap_err();
        assert!(matches!(err, PermError::NotFound(_)));

        let err = store
            .get_from_key("model.articles.Article.add", None)
            .await
            .unwrap_err();
        assert!(matches!(err, PermError::NotFound(_)));

        assert!(store.list().await.unwrap().is_empty());
    }

    /// Test that exact lookup ignores the wildcard row
    #[tokio::test]
    async fn test_get_from_key_is_exact() {
        let fixture = TestSystem::new();
        let store = fixture.system.store();

        store
            .create_from_key("model.articles.Article.*", None)
            .await
            .unwrap();

        let err = store
            .get_from_key("model.articles.Article.add", None)
            .await
            .unwrap_err();
        assert!(matches!(err, PermError::NotFound(_)));
    }

    /// Test the auto-create policy on the grant-path resolution
    #[tokio::test]
    async fn test_resolve_or_create_honors_auto_create() {
        let auto = TestSystem::auto_create();
        let store = auto.system.store();
        let wildcard = store
            .create_from_key("model.articles.Article.*", None)
            .await
            .unwrap();

        let resolved = store.resolve_or_create(&article_key("add")).await.unwrap();
        assert_ne!(resolved.id, wildcard.id);
        assert_eq!(resolved.key.codename, "add");

        let plain = TestSystem::new();
        let store = plain.system.store();
        let wildcard = store
            .create_from_key("model.articles.Article.*", None)
            .await
            .unwrap();

        let resolved = store.resolve_or_create(&article_key("add")).await.unwrap();
        assert_eq!(resolved.id, wildcard.id);
    }

    // ==================== Existence Checks ====================

    /// Test that existence checks see the scope wildcard
    #[tokio::test]
    async fn test_perm_exists_sees_wildcard() {
        let fixture = TestSystem::new();
        let store = fixture.system.store();

        store
            .create_from_key("model.articles.Article.*", None)
            .await
            .unwrap();

        assert!(store.perm_exists("model.articles.Article.add", None).await.unwrap());
        assert!(store.perm_exists("model.articles.Article.*", None).await.unwrap());
        assert!(!store.perm_exists("model.shop.Order.add", None).await.unwrap());
    }

    /// Test that existence checks report malformed keys instead of false
    #[tokio::test]
    async fn test_perm_exists_propagates_parse_errors() {
        let fixture = TestSystem::new();
        let err = fixture
            .system
            .store()
            .perm_exists("not-a-key", None)
            .await
            .unwrap_err();
        assert!(matches!(err, PermError::MalformedKey(_)));
    }

    // ==================== Listing and Display ====================

    /// Test that listings order by codename and break ties by id
    #[tokio::test]
    async fn test_listing_orders_by_codename_then_id() {
        let fixture = TestSystem::new();
        let store = fixture.system.store();

        store
            .create_from_keys(
                &["generic.delta", "generic.alpha", "model.articles.Article.alpha"],
                None,
            )
            .await
            .unwrap();

        let perms = store.list().await.unwrap();
        let codenames: Vec<&str> = perms.iter().map(|p| p.key.codename.as_str()).collect();
        assert_eq!(codenames, vec!["alpha", "alpha", "delta"]);
        assert!(perms[0].id < perms[1].id);
    }

    /// Test that kind listings filter to one kind
    #[tokio::test]
    async fn test_list_by_kind_filters() {
        let fixture = TestSystem::new();
        let store = fixture.system.store();

        store
            .create_from_keys(
                &[
                    "generic.export",
                    "model.articles.Article.add",
                    "field.articles.Article.title.change",
                ],
                None,
            )
            .await
            .unwrap();

        let models = store.list_by_kind(PermKind::Model).await.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].key.kind, PermKind::Model);

        assert!(store.list_by_kind(PermKind::Object).await.unwrap().is_empty());
    }

    /// Test display names: explicit name, configured codename, fallback
    #[tokio::test]
    async fn test_describe_uses_configured_display_names() {
        let mut codenames = HashMap::new();
        codenames.insert("publish".to_string(), "Publish entries".to_string());
        let fixture = TestSystem::with_perms(PermsConfig {
            codenames,
            ..PermsConfig::default()
        });
        let store = fixture.system.store();

        let publish = store
            .create_from_key("model.articles.Article.publish", None)
            .await
            .unwrap();
        assert_eq!(
            store.describe(&publish),
            "Permission | model articles.Article | Publish entries"
        );

        let wildcard = store
            .create_from_key("model.articles.Article.*", None)
            .await
            .unwrap();
        assert_eq!(
            store.describe(&wildcard),
            "Permission | model articles.Article | wildcard"
        );

        let named = fixture
            .backend
            .insert_perm(&article_key("add"), Some("Create articles".to_string()))
            .await
            .unwrap();
        assert_eq!(store.describe(&named), "Create articles");
    }

    // ==================== Deletion ====================

    /// Test that deleting a row drops its grants with it
    #[tokio::test]
    async fn test_delete_cascades_to_grants() {
        let fixture = TestSystem::new();
        let directory = seed_directory(&fixture.backend).await;
        let store = fixture.system.store();

        let perm = store
            .create_from_key("model.articles.Article.add", None)
            .await
            .unwrap();
        let alice = fixture.system.user(directory.alice.id);
        alice.add((&perm).into(), None).await.unwrap();
        assert_eq!(alice.all().await.unwrap().len(), 1);

        assert!(store.delete(perm.id).await.unwrap());
        assert!(alice.all().await.unwrap().is_empty());
        assert!(!store.delete(perm.id).await.unwrap());
    }
}
