use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use crate::app::App;
use crate::config::Config;
use crate::db::NoEncryption;
use crate::error::AppError;
use crate::models::{
    ChecklistCategory, ChecklistInputType, ChecklistItem, DefectCategory, DefectSeverity,
    Inspection, Inspector, NewDefect, NewInspection,
};

// Helper to set up an isolated app instance on a fresh data directory.
// The TempDir must stay alive for as long as the app is used.
async fn setup_app() -> (TempDir, App) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let app = App::init(Config::with_data_dir(dir.path()), &NoEncryption)
        .await
        .expect("Failed to initialize app");
    (dir, app)
}

async fn create_test_inspector(app: &App) -> Inspector {
    app.inspectors
        .create(
            "Test Inspector".to_string(),
            "Acme Marine Surveys".to_string(),
            "Lead Surveyor".to_string(),
        )
        .await
        .expect("Failed to create inspector")
}

fn sample_new_inspection(inspector_id: &str) -> NewInspection {
    NewInspection {
        lot_number: "LOT-2025-001".to_string(),
        container_number: None,
        product_type_id: "sheet".to_string(),
        quantity: 100.5,
        weight: 2500.0,
        unit: "tons".to_string(),
        port_location: "Rotterdam Berth 12".to_string(),
        weather_conditions: "Clear, 18C".to_string(),
        inspector_id: inspector_id.to_string(),
        notes: None,
        latitude: None,
        longitude: None,
    }
}

async fn create_test_inspection(app: &App) -> Inspection {
    let inspector = create_test_inspector(app).await;
    app.inspections
        .create(sample_new_inspection(&inspector.id))
        .await
        .expect("Failed to create inspection")
}

fn sample_new_defect(inspection_id: &str) -> NewDefect {
    NewDefect {
        inspection_id: inspection_id.to_string(),
        defect_type: "Surface Corrosion".to_string(),
        defect_category: DefectCategory::Surface,
        severity: DefectSeverity::Major,
        count: 3,
        description: "Heavy corrosion along the outer coil edges".to_string(),
        location_notes: None,
        affected_quantity: Some(12.0),
        affected_percentage: Some(8.5),
    }
}

// Small but real image so dimension probing and PDF embedding work.
fn write_test_image(path: &Path) {
    let image = image::RgbImage::from_pixel(8, 6, image::Rgb([120, 30, 200]));
    image.save(path).expect("Failed to write test image");
}

mod inspection_lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_draft_status_and_matching_timestamps() {
        let (_dir, app) = setup_app().await;
        let created = create_test_inspection(&app).await;

        assert_eq!(created.status, crate::models::InspectionStatus::Draft);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.quantity, 100.5);
        assert_eq!(created.weight, 2500.0);
        assert!(created.completed_at.is_none());
    }

    #[tokio::test]
    async fn round_trip_preserves_every_field() {
        let (_dir, app) = setup_app().await;
        let inspector = create_test_inspector(&app).await;

        let mut input = sample_new_inspection(&inspector.id);
        input.container_number = Some("MSCU1234567".to_string());
        input.notes = Some("Deck cargo, tarpaulin cover".to_string());
        input.latitude = Some(51.95);
        input.longitude = Some(4.14);
        let created = app.inspections.create(input).await.expect("create");

        let loaded = app
            .inspections
            .get(&created.id)
            .await
            .expect("get")
            .expect("inspection should exist");
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn round_trip_preserves_absent_optionals() {
        let (_dir, app) = setup_app().await;
        let created = create_test_inspection(&app).await;

        let loaded = app
            .inspections
            .get(&created.id)
            .await
            .expect("get")
            .expect("inspection should exist");
        assert_eq!(loaded.container_number, None);
        assert_eq!(loaded.notes, None);
        assert_eq!(loaded.latitude, None);
        assert_eq!(loaded.longitude, None);
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn create_rejects_invalid_lot_number() {
        let (_dir, app) = setup_app().await;
        let inspector = create_test_inspector(&app).await;

        let mut input = sample_new_inspection(&inspector.id);
        input.lot_number = "LOT@2025".to_string();

        let error = app.inspections.create(input).await.unwrap_err();
        match error {
            AppError::Validation(message) => assert!(message.contains("can only contain")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_rejects_nonpositive_quantity_and_weight() {
        let (_dir, app) = setup_app().await;
        let inspector = create_test_inspector(&app).await;

        let mut input = sample_new_inspection(&inspector.id);
        input.quantity = 0.0;
        assert!(app.inspections.create(input).await.is_err());

        let mut input = sample_new_inspection(&inspector.id);
        input.weight = -10.0;
        assert!(app.inspections.create(input).await.is_err());
    }

    #[tokio::test]
    async fn update_refreshes_updated_at() {
        let (_dir, app) = setup_app().await;
        let created = create_test_inspection(&app).await;

        let mut edited = created.clone();
        edited.notes = Some("Recounted after discharge".to_string());
        let updated = app.inspections.update(edited).await.expect("update");

        assert!(updated.updated_at > created.updated_at);
        let loaded = app.inspections.get(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.notes.as_deref(), Some("Recounted after discharge"));
    }

    #[tokio::test]
    async fn status_transitions_follow_the_lifecycle() {
        let (_dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        // Completing a draft must fail.
        assert!(app.inspections.complete(&inspection.id).await.is_err());

        app.inspections.start(&inspection.id).await.expect("start");
        let started = app.inspections.get(&inspection.id).await.unwrap().unwrap();
        assert_eq!(started.status, crate::models::InspectionStatus::InProgress);

        // Starting twice must fail.
        let error = app.inspections.start(&inspection.id).await.unwrap_err();
        assert!(matches!(error, AppError::BusinessRule(_)));

        app.inspections
            .complete(&inspection.id)
            .await
            .expect("complete");
        let completed = app.inspections.get(&inspection.id).await.unwrap().unwrap();
        assert_eq!(completed.status, crate::models::InspectionStatus::Completed);
        assert!(completed.completed_at.is_some());

        // Completed inspections can be neither cancelled nor deleted.
        assert!(app.inspections.cancel(&inspection.id).await.is_err());
        let error = app.inspections.delete(&inspection.id).await.unwrap_err();
        match error {
            AppError::BusinessRule(message) => {
                assert_eq!(message, "Cannot delete completed inspections")
            }
            other => panic!("expected business rule error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancel_is_allowed_from_draft_and_in_progress() {
        let (_dir, app) = setup_app().await;
        let inspector = create_test_inspector(&app).await;

        let draft = app
            .inspections
            .create(sample_new_inspection(&inspector.id))
            .await
            .unwrap();
        app.inspections.cancel(&draft.id).await.expect("cancel draft");

        let mut input = sample_new_inspection(&inspector.id);
        input.lot_number = "LOT-2025-002".to_string();
        let second = app.inspections.create(input).await.unwrap();
        app.inspections.start(&second.id).await.unwrap();
        app.inspections
            .cancel(&second.id)
            .await
            .expect("cancel in-progress");
    }

    #[tokio::test]
    async fn search_matches_lot_container_and_port() {
        let (_dir, app) = setup_app().await;
        let inspector = create_test_inspector(&app).await;

        let mut input = sample_new_inspection(&inspector.id);
        input.container_number = Some("MSCU7654321".to_string());
        app.inspections.create(input).await.unwrap();

        assert_eq!(app.inspections.search("LOT-2025").await.unwrap().len(), 1);
        assert_eq!(app.inspections.search("7654321").await.unwrap().len(), 1);
        assert_eq!(app.inspections.search("Rotterdam").await.unwrap().len(), 1);
        assert_eq!(app.inspections.search("Hamburg").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn statistics_count_by_status_in_sql() {
        let (_dir, app) = setup_app().await;
        let inspector = create_test_inspector(&app).await;

        for index in 0..3 {
            let mut input = sample_new_inspection(&inspector.id);
            input.lot_number = format!("LOT-2025-00{index}");
            app.inspections.create(input).await.unwrap();
        }
        let all = app.inspections.list().await.unwrap();
        app.inspections.start(&all[0].id).await.unwrap();
        app.inspections.complete(&all[0].id).await.unwrap();
        app.inspections.cancel(&all[1].id).await.unwrap();

        let statistics = app.inspections.statistics().await.unwrap();
        assert_eq!(statistics.total, 3);
        assert_eq!(statistics.draft, 1);
        assert_eq!(statistics.in_progress, 0);
        assert_eq!(statistics.completed, 1);
        assert_eq!(statistics.cancelled, 1);
        assert!((statistics.total_quantity - 301.5).abs() < 1e-6);
        assert!((statistics.completion_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn missing_inspection_is_none_not_an_error() {
        let (_dir, app) = setup_app().await;
        assert!(app.inspections.get("no-such-id").await.unwrap().is_none());
    }
}

mod cascade_delete_tests {
    use super::*;

    #[tokio::test]
    async fn deleting_an_inspection_leaves_no_orphans() {
        let (dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        let defect = app
            .defects
            .add(sample_new_defect(&inspection.id))
            .await
            .expect("add defect");

        let capture = dir.path().join("capture.png");
        write_test_image(&capture);
        let photo = app
            .photos
            .save_captured(&inspection.id, &capture, None, Some(defect.id.clone()))
            .await
            .expect("save photo");
        assert!(Path::new(&photo.file_path).exists());

        let item = app
            .checklists
            .add_item(ChecklistItem::new(
                ChecklistCategory::QualityControl,
                "Cargo free of visible damage?".to_string(),
                ChecklistInputType::Boolean,
            ))
            .await
            .expect("add checklist item");
        app.checklists
            .record_response(inspection.id.clone(), item.id.clone(), "false".to_string(), None)
            .await
            .expect("record response");

        app.inspections.delete(&inspection.id).await.expect("delete");

        assert!(app.inspections.get(&inspection.id).await.unwrap().is_none());
        assert_eq!(
            app.defects.list_by_inspection(&inspection.id).await.unwrap().len(),
            0
        );
        assert_eq!(
            app.photos.count_by_inspection(&inspection.id).await.unwrap(),
            0
        );
        assert_eq!(
            app.checklists.responses_for(&inspection.id).await.unwrap().len(),
            0
        );
        assert!(!Path::new(&photo.file_path).exists());
    }
}

mod defect_tests {
    use super::*;

    #[tokio::test]
    async fn add_validates_description_and_count() {
        let (_dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        let mut short = sample_new_defect(&inspection.id);
        short.description = "rust".to_string();
        let error = app.defects.add(short).await.unwrap_err();
        match error {
            AppError::Validation(message) => {
                assert_eq!(message, "Description must be at least 10 characters")
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let mut zero = sample_new_defect(&inspection.id);
        zero.count = 0;
        assert!(app.defects.add(zero).await.is_err());

        let mut untyped = sample_new_defect(&inspection.id);
        untyped.defect_type = " ".to_string();
        assert!(app.defects.add(untyped).await.is_err());
    }

    #[tokio::test]
    async fn severity_counts_are_computed_in_sql() {
        let (_dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        let mut critical = sample_new_defect(&inspection.id);
        critical.severity = DefectSeverity::Critical;
        app.defects.add(critical).await.unwrap();

        app.defects.add(sample_new_defect(&inspection.id)).await.unwrap();
        app.defects.add(sample_new_defect(&inspection.id)).await.unwrap();

        let counts = app.defects.severity_counts(&inspection.id).await.unwrap();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.major, 2);
        assert_eq!(counts.minor, 0);
        assert_eq!(counts.cosmetic, 0);
    }

    #[tokio::test]
    async fn known_types_lists_distinct_types_per_category() {
        let (_dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        app.defects.add(sample_new_defect(&inspection.id)).await.unwrap();
        app.defects.add(sample_new_defect(&inspection.id)).await.unwrap();
        let mut scratches = sample_new_defect(&inspection.id);
        scratches.defect_type = "Surface Scratches".to_string();
        app.defects.add(scratches).await.unwrap();

        let types = app.defects.known_types(DefectCategory::Surface).await.unwrap();
        assert_eq!(types, vec!["Surface Corrosion", "Surface Scratches"]);
    }
}

mod photo_tests {
    use super::*;

    async fn add_photo(app: &App, dir: &Path, inspection_id: &str, name: &str) -> crate::models::InspectionPhoto {
        let capture = dir.join(name);
        write_test_image(&capture);
        app.photos
            .save_captured(inspection_id, &capture, None, None)
            .await
            .expect("save photo")
    }

    #[tokio::test]
    async fn sequence_indices_stay_contiguous_after_deletion() {
        let (dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        let first = add_photo(&app, dir.path(), &inspection.id, "a.png").await;
        let second = add_photo(&app, dir.path(), &inspection.id, "b.png").await;
        let third = add_photo(&app, dir.path(), &inspection.id, "c.png").await;
        assert_eq!(
            (first.sequence_index, second.sequence_index, third.sequence_index),
            (0, 1, 2)
        );

        app.photos.delete(&second.id).await.expect("delete photo");

        let remaining = app.photos.list_by_inspection(&inspection.id).await.unwrap();
        let indices: Vec<i64> = remaining.iter().map(|p| p.sequence_index).collect();
        assert_eq!(indices, vec![0, 1]);
        let ids: Vec<&str> = remaining.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), third.id.as_str()]);

        assert!(!Path::new(&second.file_path).exists());
        assert!(Path::new(&first.file_path).exists());
        assert!(Path::new(&third.file_path).exists());
    }

    #[tokio::test]
    async fn save_probes_dimensions_and_size() {
        let (dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        let photo = add_photo(&app, dir.path(), &inspection.id, "probe.png").await;
        assert_eq!(photo.image_width, 8);
        assert_eq!(photo.image_height, 6);
        assert!(photo.file_size > 0);
        // The capture file was moved into managed storage.
        assert!(!dir.path().join("probe.png").exists());
        assert!(Path::new(&photo.file_path).exists());
    }

    #[tokio::test]
    async fn save_rejects_missing_and_invalid_files() {
        let (dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        let missing = dir.path().join("nope.jpg");
        let error = app
            .photos
            .save_captured(&inspection.id, &missing, None, None)
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));

        let bogus = dir.path().join("not_an_image.jpg");
        std::fs::write(&bogus, b"definitely not image data").unwrap();
        let error = app
            .photos
            .save_captured(&inspection.id, &bogus, None, None)
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn caption_rules_apply_on_save_and_update() {
        let (dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        let capture = dir.path().join("captioned.png");
        write_test_image(&capture);
        let too_long = "c".repeat(201);
        let error = app
            .photos
            .save_captured(&inspection.id, &capture, Some(too_long.clone()), None)
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));

        let photo = app
            .photos
            .save_captured(&inspection.id, &capture, Some("Port side".to_string()), None)
            .await
            .unwrap();
        assert!(app.photos.update_caption(&photo.id, Some(too_long)).await.is_err());
        app.photos
            .update_caption(&photo.id, Some("Starboard side".to_string()))
            .await
            .unwrap();
        let loaded = app.photos.get(&photo.id).await.unwrap().unwrap();
        assert_eq!(loaded.caption.as_deref(), Some("Starboard side"));
    }
}

mod inspector_tests {
    use super::*;

    #[tokio::test]
    async fn set_active_is_a_single_global_selection() {
        let (_dir, app) = setup_app().await;
        let first = create_test_inspector(&app).await;
        let second = app
            .inspectors
            .create(
                "Second Inspector".to_string(),
                "Acme Marine Surveys".to_string(),
                "Surveyor".to_string(),
            )
            .await
            .unwrap();

        app.inspectors.set_active(&first.id).await.unwrap();
        app.inspectors.set_active(&second.id).await.unwrap();

        let active = app.inspectors.active().await.unwrap().unwrap();
        assert_eq!(active.id, second.id);

        let active_flags: Vec<bool> = app
            .inspectors
            .list()
            .await
            .unwrap()
            .iter()
            .map(|i| i.is_active)
            .collect();
        assert_eq!(active_flags.iter().filter(|flag| **flag).count(), 1);
    }

    #[tokio::test]
    async fn active_selection_survives_reopening_the_database() {
        let (dir, app) = setup_app().await;
        let inspector = create_test_inspector(&app).await;
        app.inspectors.set_active(&inspector.id).await.unwrap();
        drop(app);

        let reopened = App::init(Config::with_data_dir(dir.path()), &NoEncryption)
            .await
            .expect("reopen");
        let active = reopened.inspectors.active().await.unwrap().unwrap();
        assert_eq!(active.id, inspector.id);
    }

    #[tokio::test]
    async fn deleting_the_active_inspector_clears_the_selection() {
        let (_dir, app) = setup_app().await;
        let inspector = create_test_inspector(&app).await;
        app.inspectors.set_active(&inspector.id).await.unwrap();

        app.inspectors.delete(&inspector.id).await.unwrap();
        assert!(app.inspectors.active().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_enforces_name_rules() {
        let (_dir, app) = setup_app().await;

        let error = app
            .inspectors
            .create("J4ne".to_string(), "Acme".to_string(), "Surveyor".to_string())
            .await
            .unwrap_err();
        match error {
            AppError::Validation(message) => {
                assert_eq!(message, "Name can only contain letters, spaces, periods and hyphens")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

mod product_type_tests {
    use super::*;

    #[tokio::test]
    async fn default_product_types_are_seeded_on_creation() {
        let (_dir, app) = setup_app().await;

        let all = app.product_types.list().await.unwrap();
        assert_eq!(all.len(), 6);

        let sheet = app.product_types.get("sheet").await.unwrap().unwrap();
        assert_eq!(sheet.name, "Steel Sheet");
        assert!(sheet.is_active);

        for name in [
            "Steel Sheet",
            "Steel Pipe",
            "Steel Bar",
            "Steel Profile",
            "Steel Coil",
            "Steel Plate",
        ] {
            assert!(
                app.product_types.get_by_name(name).await.unwrap().is_some(),
                "missing seeded product type {name}"
            );
        }
    }

    #[tokio::test]
    async fn product_type_names_are_unique() {
        let (_dir, app) = setup_app().await;

        let error = app
            .product_types
            .create("Steel Sheet".to_string(), "Duplicate".to_string())
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Database(_)));
    }

    #[tokio::test]
    async fn deactivated_types_drop_out_of_the_active_list() {
        let (_dir, app) = setup_app().await;

        app.product_types.set_active("coil", false).await.unwrap();
        let active = app.product_types.list_active().await.unwrap();
        assert_eq!(active.len(), 5);
        assert!(active.iter().all(|p| p.id != "coil"));
    }
}

mod checklist_tests {
    use super::*;

    async fn add_item(app: &App, input_type: ChecklistInputType, required: bool, options: Option<&str>) -> ChecklistItem {
        let mut item = ChecklistItem::new(
            ChecklistCategory::Loading,
            "Test question?".to_string(),
            input_type,
        );
        item.is_required = required;
        item.options = options.map(str::to_string);
        app.checklists.add_item(item).await.expect("add item")
    }

    #[tokio::test]
    async fn required_items_reject_blank_responses() {
        let (_dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;
        let item = add_item(&app, ChecklistInputType::Text, true, None).await;

        let error = app
            .checklists
            .record_response(inspection.id.clone(), item.id.clone(), "  ".to_string(), None)
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn typed_responses_are_validated() {
        let (_dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        let number = add_item(&app, ChecklistInputType::Number, false, None).await;
        assert!(app
            .checklists
            .record_response(inspection.id.clone(), number.id.clone(), "abc".to_string(), None)
            .await
            .is_err());
        assert!(app
            .checklists
            .record_response(inspection.id.clone(), number.id.clone(), "42.5".to_string(), None)
            .await
            .is_ok());

        let boolean = add_item(&app, ChecklistInputType::Boolean, false, None).await;
        assert!(app
            .checklists
            .record_response(inspection.id.clone(), boolean.id.clone(), "yes".to_string(), None)
            .await
            .is_err());

        let date = add_item(&app, ChecklistInputType::Date, false, None).await;
        assert!(app
            .checklists
            .record_response(inspection.id.clone(), date.id.clone(), "2025-08-06".to_string(), None)
            .await
            .is_ok());
        assert!(app
            .checklists
            .record_response(inspection.id.clone(), date.id.clone(), "06.08.2025".to_string(), None)
            .await
            .is_err());

        let radio = add_item(
            &app,
            ChecklistInputType::Radio,
            false,
            Some(r#"["pass","fail"]"#),
        )
        .await;
        assert!(app
            .checklists
            .record_response(inspection.id.clone(), radio.id.clone(), "pass".to_string(), None)
            .await
            .is_ok());
        assert!(app
            .checklists
            .record_response(inspection.id.clone(), radio.id.clone(), "maybe".to_string(), None)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn responses_are_listed_per_inspection() {
        let (_dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;
        let item = add_item(&app, ChecklistInputType::Text, false, None).await;

        app.checklists
            .record_response(
                inspection.id.clone(),
                item.id.clone(),
                "All bundles strapped".to_string(),
                Some("Checked after loading".to_string()),
            )
            .await
            .unwrap();

        let responses = app.checklists.responses_for(&inspection.id).await.unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].response_value, "All bundles strapped");
    }
}

mod migration_tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    #[tokio::test]
    async fn gps_migration_backfills_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(dir.path().join("migrate.db"))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        crate::db::migrations::run_to(&pool, 1).await.unwrap();
        assert_eq!(crate::db::migrations::current_version(&pool).await.unwrap(), 1);

        // A row written under the v1 schema, before GPS columns existed.
        sqlx::query(
            r#"
            INSERT INTO inspections (
                id, lot_number, product_type_id, quantity, weight, unit,
                port_location, weather_conditions, inspector_id, status,
                created_at, updated_at
            )
            VALUES ('ins-1', 'LOT-OLD-001', 'sheet', 10.0, 100.0, 'tons',
                    'Hamburg Terminal 3', 'Overcast', 'inspector-1', 'draft',
                    '2024-01-01 08:00:00+00:00', '2024-01-01 08:00:00+00:00')
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        crate::db::migrations::run_to(&pool, 2).await.unwrap();
        assert_eq!(crate::db::migrations::current_version(&pool).await.unwrap(), 2);

        let (lot_number, latitude, longitude): (String, f64, f64) = sqlx::query_as(
            "SELECT lot_number, latitude, longitude FROM inspections WHERE id = 'ins-1'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(lot_number, "LOT-OLD-001");
        assert_eq!(latitude, 0.0);
        assert_eq!(longitude, 0.0);
    }

    #[tokio::test]
    async fn migrations_are_idempotent_on_reopen() {
        let (dir, app) = setup_app().await;
        create_test_inspection(&app).await;
        drop(app);

        let reopened = App::init(Config::with_data_dir(dir.path()), &NoEncryption)
            .await
            .expect("reopen");
        assert_eq!(reopened.inspections.list().await.unwrap().len(), 1);
        // The seed must not run twice.
        assert_eq!(reopened.product_types.list().await.unwrap().len(), 6);
    }
}

mod watch_tests {
    use super::*;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn watch_emits_initial_and_changed_result_sets() {
        let (_dir, app) = setup_app().await;
        let mut stream = app.inspections.watch_all();

        let initial = timeout(WAIT, stream.recv()).await.unwrap().unwrap();
        assert_eq!(initial.len(), 0);

        create_test_inspection(&app).await;

        let updated = timeout(WAIT, stream.recv()).await.unwrap().unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].lot_number, "LOT-2025-001");
    }

    #[tokio::test]
    async fn watch_by_inspection_sees_new_defects() {
        let (_dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;
        let mut stream = app.defects.watch_by_inspection(inspection.id.clone());

        let initial = timeout(WAIT, stream.recv()).await.unwrap().unwrap();
        assert_eq!(initial.len(), 0);

        app.defects.add(sample_new_defect(&inspection.id)).await.unwrap();

        let updated = timeout(WAIT, stream.recv()).await.unwrap().unwrap();
        assert_eq!(updated.len(), 1);
    }
}

mod export_tests {
    use super::*;

    #[tokio::test]
    async fn inspections_csv_has_header_plus_one_row_per_inspection() {
        let (_dir, app) = setup_app().await;
        let inspector = create_test_inspector(&app).await;

        for index in 0..3 {
            let mut input = sample_new_inspection(&inspector.id);
            input.lot_number = format!("LOT-2025-10{index}");
            app.inspections.create(input).await.unwrap();
        }

        let path = app.reports.export_inspections_csv().await.unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Inspection ID,Lot Number,Container Number,Product Type"));
        for line in &lines[1..] {
            assert!(line.contains("LOT-2025-10"));
            assert!(line.contains("Test Inspector"));
            assert!(line.contains("Steel Sheet"));
        }
    }

    #[tokio::test]
    async fn defect_and_photo_csv_exports_write_header_rows() {
        let (dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;
        app.defects.add(sample_new_defect(&inspection.id)).await.unwrap();
        let capture = dir.path().join("export.png");
        write_test_image(&capture);
        app.photos
            .save_captured(&inspection.id, &capture, None, None)
            .await
            .unwrap();

        let defects_csv = app.reports.export_defects_csv().await.unwrap();
        let content = std::fs::read_to_string(&defects_csv).unwrap();
        assert!(content.starts_with("Defect ID,Inspection ID,Defect Type"));
        assert_eq!(content.lines().count(), 2);

        let photos_csv = app.reports.export_photos_csv().await.unwrap();
        let content = std::fs::read_to_string(&photos_csv).unwrap();
        assert!(content.starts_with("Photo ID,Inspection ID,Defect Record ID"));
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test]
    async fn pdf_generation_handles_zero_defects_and_zero_photos() {
        let (_dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        let path = app.reports.generate_pdf(&inspection.id).await.unwrap();
        assert!(path.exists());
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
        // No partial temp file left behind.
        assert!(!path.with_extension("pdf.tmp").exists());
    }

    #[tokio::test]
    async fn pdf_generation_embeds_defects_and_photos() {
        let (dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;
        app.defects.add(sample_new_defect(&inspection.id)).await.unwrap();
        let capture = dir.path().join("pdf.png");
        write_test_image(&capture);
        app.photos
            .save_captured(&inspection.id, &capture, Some("Deck view".to_string()), None)
            .await
            .unwrap();

        let path = app.reports.generate_pdf(&inspection.id).await.unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn pdf_generation_fails_with_not_found_for_unknown_inspection() {
        let (_dir, app) = setup_app().await;
        let error = app.reports.generate_pdf("no-such-id").await.unwrap_err();
        assert!(matches!(error, AppError::NotFound(_)));
    }
}

mod backup_tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn backup_then_restore_brings_deleted_data_back() {
        let (dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;
        let capture = dir.path().join("backup.png");
        write_test_image(&capture);
        let photo = app
            .photos
            .save_captured(&inspection.id, &capture, None, None)
            .await
            .unwrap();

        let archive = app.backup.create_backup().await.expect("create backup");
        assert!(archive.exists());
        assert!(
            archive
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("MetalInspect_backup_")
        );

        app.inspections.delete(&inspection.id).await.unwrap();
        assert!(app.inspections.get(&inspection.id).await.unwrap().is_none());
        assert!(!Path::new(&photo.file_path).exists());

        app.backup.restore_backup(&archive).await.expect("restore");

        let restored = app
            .inspections
            .get(&inspection.id)
            .await
            .unwrap()
            .expect("inspection restored");
        assert_eq!(restored.lot_number, "LOT-2025-001");
        assert!(Path::new(&photo.file_path).exists());
    }

    #[tokio::test]
    async fn restore_from_missing_archive_fails_cleanly() {
        let (dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        let error = app
            .backup
            .restore_backup(&dir.path().join("nope.zip"))
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Backup(_)));

        // Live data untouched and the pool still usable.
        assert!(app.inspections.get(&inspection.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn restore_rejects_archives_without_a_database() {
        let (dir, app) = setup_app().await;
        let inspection = create_test_inspection(&app).await;

        let bogus = dir.path().join("bogus.zip");
        let file = std::fs::File::create(&bogus).unwrap();
        let mut zip = zip::write::ZipWriter::new(file);
        zip.start_file("backup_info.txt", zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(b"not a real backup").unwrap();
        zip.finish().unwrap();

        let error = app.backup.restore_backup(&bogus).await.unwrap_err();
        match error {
            AppError::Backup(message) => {
                assert_eq!(message, "Backup does not contain a database file")
            }
            other => panic!("expected backup error, got {other:?}"),
        }
        assert!(app.inspections.get(&inspection.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn list_backups_returns_created_archives() {
        let (_dir, app) = setup_app().await;
        create_test_inspection(&app).await;

        app.backup.create_backup().await.unwrap();
        let backups = app.backup.list_backups().await.unwrap();
        assert_eq!(backups.len(), 1);

        let removed = app
            .backup
            .delete_old_backups(Duration::from_secs(0))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(app.backup.list_backups().await.unwrap().is_empty());
    }
}
