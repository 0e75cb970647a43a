use std::sync::Arc;

use crate::backup::BackupManager;
use crate::config::Config;
use crate::db::{Db, KeyProvider};
use crate::error::Result;
use crate::export::{CsvExporter, PdfReportGenerator};
use crate::services::{
    BackupService, ChecklistService, DefectService, InspectionService, InspectorService,
    PhotoService, ProductTypeService, ReportService,
};
use crate::store::{
    ChangeNotifier, ChecklistStore, DefectStore, InspectionStore, InspectorStore, PhotoStore,
    ProductTypeStore,
};

/// Composition root: opens the database and wires every store and service
/// through plain constructor injection.
pub struct App {
    pub config: Arc<Config>,
    pub db: Arc<Db>,
    pub inspections: InspectionService,
    pub defects: DefectService,
    pub photos: PhotoService,
    pub inspectors: InspectorService,
    pub product_types: ProductTypeService,
    pub checklists: ChecklistService,
    pub reports: ReportService,
    pub backup: BackupService,
}

impl App {
    pub async fn init(config: Config, keys: &dyn KeyProvider) -> Result<Self> {
        let config = Arc::new(config);
        let db = Db::open(&config, keys).await?;
        let notifier = ChangeNotifier::new();

        let inspection_store = InspectionStore::new(db.clone(), notifier.clone());
        let defect_store = DefectStore::new(db.clone(), notifier.clone());
        let photo_store = PhotoStore::new(db.clone(), notifier.clone());
        let inspector_store = InspectorStore::new(db.clone(), notifier.clone());
        let product_type_store = ProductTypeStore::new(db.clone(), notifier.clone());
        let checklist_store = ChecklistStore::new(db.clone(), notifier.clone());

        let pdf = PdfReportGenerator::new(config.reports_dir.clone());
        let csv = CsvExporter::new(config.reports_dir.clone());

        let reports = ReportService::new(
            inspection_store.clone(),
            defect_store.clone(),
            photo_store.clone(),
            inspector_store.clone(),
            product_type_store.clone(),
            pdf,
            csv,
        );
        let backup = BackupService::new(BackupManager::new(db.clone(), config.clone()));

        Ok(Self {
            inspections: InspectionService::new(inspection_store),
            defects: DefectService::new(defect_store),
            photos: PhotoService::new(photo_store, config.clone()),
            inspectors: InspectorService::new(inspector_store),
            product_types: ProductTypeService::new(product_type_store),
            checklists: ChecklistService::new(checklist_store),
            reports,
            backup,
            config,
            db,
        })
    }
}
