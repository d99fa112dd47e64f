//! Holder view integration tests
//!
//! Exercises the per-holder surface obtained from the system handle:
//! granting, revoking, listing direct and effective permissions, and the
//! lookup of effectively-held rows.

#[cfg(test)]
mod tests {
    use permkit::{HolderRef, PermError};

    use crate::common::{TestSystem, seed_directory};

    const ADD: &str = "model.articles.Article.add";

    // ==================== Granting and Revoking ====================

    /// Test the grant, check, revoke roundtrip
    #[tokio::test]
    async fn test_add_and_check_roundtrip() {
        let fixture = TestSystem::auto_create();
        let directory = seed_directory(&fixture.backend).await;
        let alice = fixture.system.user(directory.alice.id);

        let perm = alice.add(ADD.into(), None).await.unwrap();
        assert_eq!(perm.key.codename, "add");
        assert!(alice.has_perm(ADD.into(), None).await.unwrap());

        alice.remove(ADD.into(), None).await.unwrap();
        assert!(!alice.has_perm(ADD.into(), None).await.unwrap());
    }

    /// Test that granting the same permission twice stays a single grant
    #[tokio::test]
    async fn test_granting_twice_is_noop() {
        let fixture = TestSystem::auto_create();
        let directory = seed_directory(&fixture.backend).await;
        let alice = fixture.system.user(directory.alice.id);

        alice.add(ADD.into(), None).await.unwrap();
        alice.add(ADD.into(), None).await.unwrap();

        assert_eq!(alice.all().await.unwrap().len(), 1);
    }

    /// Test that granting without auto-create needs an existing row
    #[tokio::test]
    async fn test_add_without_rows_requires_auto_create() {
        let fixture = TestSystem::new();
        let directory = seed_directory(&fixture.backend).await;
        let alice = fixture.system.user(directory.alice.id);

        let err = alice.add(ADD.into(), None).await.unwrap_err();
        assert!(matches!(err, PermError::NotFound(_)));
    }

    /// Test that granting without auto-create resolves through the wildcard
    #[tokio::test]
    async fn test_add_resolves_through_wildcard_without_auto_create() {
        let fixture = TestSystem::new();
        let directory = seed_directory(&fixture.backend).await;
        fixture
            .system
            .store()
            .create_from_key("model.articles.Article.*", None)
            .await
            .unwrap();

        let alice = fixture.system.user(directory.alice.id);
        let granted = alice
            .add("model.articles.Article.change".into(), None)
            .await
            .unwrap();

        assert!(granted.is_wildcard());
        assert!(
            alice
                .has_perm("model.articles.Article.delete".into(), None)
                .await
                .unwrap()
        );
    }

    /// Test that batch granting stops at the first bad key
    #[tokio::test]
    async fn test_add_many_fails_fast() {
        let fixture = TestSystem::auto_create();
        let directory = seed_directory(&fixture.backend).await;
        let alice = fixture.system.user(directory.alice.id);

        let err = alice
            .add_many(&[ADD, "not-a-key"], None)
            .await
            .unwrap_err();

        assert!(matches!(err, PermError::MalformedKey(_)));
        assert_eq!(alice.all().await.unwrap().len(), 1);
    }

    // ==================== Listing ====================

    /// Test that direct grants list in codename order
    #[tokio::test]
    async fn test_all_lists_direct_grants_ordered() {
        let fixture = TestSystem::auto_create();
        let directory = seed_directory(&fixture.backend).await;
        let alice = fixture.system.user(directory.alice.id);

        alice
            .add_many(
                &[
                    "model.articles.Article.change",
                    "model.articles.Article.add",
                    "generic.export",
                ],
                None,
            )
            .await
            .unwrap();

        let perms = alice.all().await.unwrap();
        let codenames: Vec<&str> = perms.iter().map(|p| p.key.codename.as_str()).collect();
        assert_eq!(codenames, vec!["add", "change", "export"]);
    }

    /// Test that the effective listing adds inherited grants
    #[tokio::test]
    async fn test_effective_includes_inherited() {
        let fixture = TestSystem::auto_create();
        let directory = seed_directory(&fixture.backend).await;

        let alice = fixture.system.user(directory.alice.id);
        alice.add("generic.export".into(), None).await.unwrap();
        fixture
            .system
            .group(directory.editors.id)
            .add(ADD.into(), None)
            .await
            .unwrap();

        assert_eq!(alice.all().await.unwrap().len(), 1);

        let effective = alice.effective().await.unwrap();
        let codenames: Vec<&str> = effective.iter().map(|p| p.key.codename.as_str()).collect();
        assert_eq!(codenames, vec!["add", "export"]);
    }

    // ==================== Lookup ====================

    /// Test that lookup returns effectively-held rows and nothing else
    #[tokio::test]
    async fn test_get_returns_effectively_held() {
        let fixture = TestSystem::auto_create();
        let directory = seed_directory(&fixture.backend).await;

        fixture
            .system
            .group(directory.editors.id)
            .add(ADD.into(), None)
            .await
            .unwrap();

        let alice = fixture.system.user(directory.alice.id);
        let held = alice.get(ADD.into(), None).await.unwrap();
        assert_eq!(held.key.codename, "add");

        let bob = fixture.system.user(directory.bob.id);
        let err = bob.get(ADD.into(), None).await.unwrap_err();
        assert!(matches!(err, PermError::NotFound(_)));

        let err = alice
            .get("model.articles.Article.missing".into(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PermError::NotFound(_)));
    }

    // ==================== Clearing ====================

    /// Test that clearing reports how many grants it removed
    #[tokio::test]
    async fn test_clear_reports_count() {
        let fixture = TestSystem::auto_create();
        let directory = seed_directory(&fixture.backend).await;
        let alice = fixture.system.user(directory.alice.id);

        alice
            .add_many(
                &[
                    ADD,
                    "model.articles.Article.change",
                    "generic.export",
                ],
                None,
            )
            .await
            .unwrap();

        assert_eq!(alice.clear().await.unwrap(), 3);
        assert!(alice.all().await.unwrap().is_empty());
        assert_eq!(alice.clear().await.unwrap(), 0);
    }

    // ==================== View Semantics ====================

    /// Test that views are windows onto shared state
    #[tokio::test]
    async fn test_views_share_state() {
        let fixture = TestSystem::auto_create();
        let directory = seed_directory(&fixture.backend).await;

        let first = fixture.system.user(directory.alice.id);
        let second = fixture.system.holder(HolderRef::User(directory.alice.id));
        assert_eq!(first.holder(), second.holder());

        first.add(ADD.into(), None).await.unwrap();
        assert!(second.has_perm(ADD.into(), None).await.unwrap());
        assert_eq!(second.all().await.unwrap().len(), 1);
    }
}
