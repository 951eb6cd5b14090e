mod common;

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use audit_library::error::ClientError;
use audit_library::hierarchy::{render_outline, ExpandState, HierarchyError, ParentScope};
use audit_library::library::audit_area::{AuditAreaChanges, NewAuditArea};
use audit_library::library::{AuditAreas, Panel};

#[tokio::test]
async fn tree_from_api() -> Result<()> {
    let server = common::TestServer::start().await?;
    let mut panel: Panel<AuditAreas, _> = Panel::new(Arc::new(server.api()));

    assert_eq!(panel.load().await?, 4);

    let forest = panel.tree("")?;
    let roots: Vec<(&str, usize)> = forest.roots.iter().map(|n| (n.name(), n.entries_count)).collect();
    assert_eq!(roots, vec![("Planning", 2), ("Procurement", 0)]);
    assert!(forest.orphans.is_empty());

    let filtered = panel.tree("FORECAST")?;
    assert_eq!(filtered.count_all_nodes(), 3);
    assert_eq!(filtered.roots[0].entries_count, 2);
    let rows = render_outline(&filtered.roots, &ExpandState::from_forest(&filtered.roots));
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Planning", "Budgeting", "Forecasting"]);
    assert_eq!(rows[2].depth, 2);

    Ok(())
}

#[tokio::test]
async fn cyclic_parent_never_reaches_backend() -> Result<()> {
    let server = common::TestServer::start().await?;
    let mut panel: Panel<AuditAreas, _> = Panel::new(Arc::new(server.api()));
    panel.load().await?;

    let changes = AuditAreaChanges {
        ara_ara_id: Some(Some(3)),
        ..Default::default()
    };
    let err = panel.update_area(1, &changes).await.unwrap_err();
    match err {
        ClientError::Hierarchy(HierarchyError::WouldCreateCycle { chain, .. }) => {
            assert_eq!(chain, vec![3, 2, 1]);
        }
        other => panic!("expected cycle rejection, got {other:?}"),
    }
    assert!(server.writes().is_empty());

    let err = panel.update_area(2, &AuditAreaChanges { ara_ara_id: Some(Some(2)), ..Default::default() }).await;
    assert!(matches!(err, Err(ClientError::Hierarchy(HierarchyError::SelfParent(2)))));
    assert!(server.writes().is_empty());

    Ok(())
}

#[tokio::test]
async fn move_to_top_level_sends_null_parent() -> Result<()> {
    let server = common::TestServer::start().await?;
    let mut panel: Panel<AuditAreas, _> = Panel::new(Arc::new(server.api()));
    panel.load().await?;

    let changes = AuditAreaChanges {
        ara_ara_id: Some(None),
        ..Default::default()
    };
    let updated = panel.update_area(3, &changes).await?;
    assert_eq!(updated.parent_id, None);

    let writes = server.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "PUT");
    assert_eq!(writes[0].1, "audit-areas/3");
    assert_eq!(writes[0].2, json!({ "ara_ara_id": null }));

    let forest = panel.tree("")?;
    assert_eq!(forest.roots.len(), 3);
    assert_eq!(forest.roots[0].entries_count, 1);

    Ok(())
}

#[tokio::test]
async fn create_checks_parent_and_patches_list() -> Result<()> {
    let server = common::TestServer::start().await?;
    let mut panel: Panel<AuditAreas, _> = Panel::new(Arc::new(server.api()));
    panel.load().await?;

    let orphan = NewAuditArea {
        ara_name: "Payroll".into(),
        ara_ara_id: Some(99),
        ara_active: 1,
    };
    assert!(matches!(
        panel.create_area(&orphan).await,
        Err(ClientError::Hierarchy(HierarchyError::UnknownParent(99)))
    ));

    let child = NewAuditArea {
        ara_name: "Bidding".into(),
        ara_ara_id: Some(4),
        ara_active: 1,
    };
    let created = panel.create_area(&child).await?;
    assert_eq!(created.parent_id, Some(4));
    assert_eq!(panel.records().len(), 5);

    let forest = panel.tree("")?;
    assert_eq!(forest.roots[1].entries_count, 1);
    assert_eq!(forest.roots[1].children[0].name(), "Bidding");

    let options: Vec<i64> = panel
        .parent_options(Some(4), ParentScope::AnyNonDescendant)
        .iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(options, vec![1, 2, 3]);

    Ok(())
}

#[tokio::test]
async fn backend_errors_keep_list_and_record_message() -> Result<()> {
    let server = common::TestServer::start().await?;
    let mut panel: Panel<AuditAreas, _> = Panel::new(Arc::new(server.api()));
    panel.load().await?;

    let blank = NewAuditArea {
        ara_name: "  ".into(),
        ara_ara_id: None,
        ara_active: 1,
    };
    let err = panel.create_area(&blank).await.unwrap_err();
    assert_eq!(err.status_code(), Some(422));
    assert_eq!(err.field_errors().unwrap()["ara_name"], "The ara_name field is required.");
    assert_eq!(panel.error(), Some("The ara_name field is required."));
    assert_eq!(panel.records().len(), 4);

    let err = panel.delete(77).await.unwrap_err();
    assert_eq!(err.to_string(), "No record in audit-areas");
    assert_eq!(panel.records().len(), 4);

    panel.delete(3).await?;
    assert_eq!(panel.records().len(), 3);
    assert_eq!(panel.error(), None);

    Ok(())
}
