use chrono::Utc;
use log::{debug, info, warn};
use std::path::Path;

use crate::error::{Result, TrackerError};
use crate::export::{ExportRecord, Sheet, SheetWriter};
use crate::models::{BrdFile, Project, ProjectDraft, ProjectField, ProjectId, Stage};

/// Issues time-derived ids that never repeat within one store
#[derive(Debug, Default)]
struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    fn next_id(&mut self) -> ProjectId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let id = now.max(self.last + 1);
        self.last = id;
        ProjectId::from_raw(id)
    }

    /// Makes sure future ids stay above one that already exists
    fn observe(&mut self, id: ProjectId) {
        self.last = self.last.max(id.as_u64());
    }
}

/// In-memory collection of projects plus the new-project draft
#[derive(Debug, Default)]
pub struct ProjectStore {
    /// Newest first
    projects: Vec<Project>,
    draft: ProjectDraft,
    select_all: bool,
    ids: IdGenerator,
}

impl ProjectStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the sample project
    pub fn with_sample() -> Self {
        let mut store = Self::new();
        let sample = Project::sample();
        store.ids.observe(sample.id);
        store.projects.push(sample);
        store
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        let found = self.projects.iter_mut().find(|p| p.id == id);
        if found.is_none() {
            debug!("No project with id {}, ignoring", id);
        }
        found
    }

    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    pub fn select_all(&self) -> bool {
        self.select_all
    }

    pub fn selected_count(&self) -> usize {
        self.projects.iter().filter(|p| p.selected).count()
    }

    /// Sets one field of the draft
    pub fn update_draft(&mut self, field: ProjectField) {
        debug!("Draft field {} updated", field.name());
        self.draft.apply(field);
    }

    /// Turns the draft into a project at the head of the list.
    ///
    /// Does nothing and returns `None` when name, email or deadline is missing.
    pub fn add_project(&mut self) -> Option<ProjectId> {
        if !self.draft.is_complete() {
            debug!(
                "Draft incomplete, missing: {}",
                self.draft.missing_required_fields().join(", ")
            );
            return None;
        }

        let id = self.ids.next_id();
        let project = match Project::from_draft(id, std::mem::take(&mut self.draft)) {
            Ok(project) => project,
            Err(draft) => {
                self.draft = draft;
                return None;
            }
        };

        info!("Added project {} ({})", project.name, id);
        self.projects.insert(0, project);
        Some(id)
    }

    /// Replaces one field of a project. Returns false for an unknown id.
    pub fn update_field(&mut self, id: ProjectId, field: ProjectField) -> bool {
        match self.get_mut(id) {
            Some(project) => {
                debug!("Project {} field {} updated", id, field.name());
                project.apply(field);
                true
            }
            None => false,
        }
    }

    /// Marks every stage up to and including `stage` as reached and every later one as not
    pub fn advance_stage(&mut self, id: ProjectId, stage: Stage) -> bool {
        match self.get_mut(id) {
            Some(project) => {
                debug!("Project {} moved to stage {}", id, stage);
                project.current_stage = Some(stage);
                true
            }
            None => false,
        }
    }

    /// Attaches a BRD file, replacing any previous one
    pub fn upload_brd_file(&mut self, id: ProjectId, file: BrdFile) -> bool {
        self.update_field(id, ProjectField::BrdFile(Some(file)))
    }

    /// Advances the UAT cycle: sign in, sign off, reset
    pub fn cycle_uat_status(&mut self, id: ProjectId) -> bool {
        match self.get_mut(id) {
            Some(project) => {
                project.uat = project.uat.next();
                debug!("Project {} UAT now {:?}", id, project.uat);
                true
            }
            None => false,
        }
    }

    /// Flips the select-all flag and copies it onto every project
    pub fn toggle_select_all(&mut self) {
        self.select_all = !self.select_all;
        let flag = self.select_all;
        for project in &mut self.projects {
            project.selected = flag;
        }
    }

    /// Flips one project's selection. The select-all flag is left as is,
    /// so it may no longer match the rows.
    pub fn toggle_selection(&mut self, id: ProjectId) -> bool {
        match self.get_mut(id) {
            Some(project) => {
                project.selected = !project.selected;
                true
            }
            None => false,
        }
    }

    /// Selected projects as export records, in list order
    pub fn selected_records(&self) -> Vec<ExportRecord> {
        self.projects
            .iter()
            .filter(|p| p.selected)
            .map(ExportRecord::from)
            .collect()
    }

    /// Writes the selected projects as one sheet. Returns the number of rows written.
    pub fn export_selected<W: SheetWriter>(
        &self,
        writer: &mut W,
        sheet_name: &str,
        path: &Path,
    ) -> Result<usize> {
        let records = self.selected_records();
        if records.is_empty() {
            warn!("Export requested with no projects selected");
            return Err(TrackerError::EmptySelection);
        }

        let sheet = Sheet::from_records(sheet_name, &records);
        writer.write_sheet(&sheet, path)?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::RecordingWriter;
    use crate::export::Cell;
    use crate::models::{ApprovalStatus, ColorCode, ProjectStatus, UatPhase};
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn fill_draft(store: &mut ProjectStore, name: &str) {
        store.update_draft(ProjectField::Name(name.into()));
        store.update_draft(ProjectField::Email(format!("{}@example.com", name.to_lowercase())));
        store.update_draft(ProjectField::Deadline(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
    }

    fn add(store: &mut ProjectStore, name: &str) -> ProjectId {
        fill_draft(store, name);
        store.add_project().expect("draft is complete")
    }

    fn sample_id() -> ProjectId {
        ProjectId::from_raw(1)
    }

    #[test]
    fn test_add_project_prepends_with_unique_id() {
        let mut store = ProjectStore::with_sample();
        let first = add(&mut store, "Alpha");
        let second = add(&mut store, "Beta");

        assert_eq!(store.projects().len(), 3);
        assert_eq!(store.projects()[0].id, second);
        assert_eq!(store.projects()[1].id, first);
        assert_eq!(store.projects()[2].id, sample_id());

        let ids: HashSet<_> = store.projects().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(second > first);
        assert!(first > sample_id());
    }

    #[test]
    fn test_add_project_requires_name_email_deadline() {
        let cases: [(&str, &str, bool); 3] = [
            ("", "pm@example.com", true),
            ("Alpha", "", true),
            ("Alpha", "pm@example.com", false),
        ];

        for (name, email, with_deadline) in cases {
            let mut store = ProjectStore::with_sample();
            store.update_draft(ProjectField::Name(name.into()));
            store.update_draft(ProjectField::Email(email.into()));
            if with_deadline {
                store.update_draft(ProjectField::Deadline(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
            }
            let draft_before = store.draft().clone();

            assert_eq!(store.add_project(), None);
            assert_eq!(store.projects().len(), 1);
            assert_eq!(store.draft(), &draft_before);
        }
    }

    #[test]
    fn test_add_project_resets_draft() {
        let mut store = ProjectStore::new();
        fill_draft(&mut store, "Alpha");
        store.update_draft(ProjectField::ColorCode(ColorCode::Red));
        store.update_draft(ProjectField::BrdNotes("phase one".into()));

        let id = store.add_project().unwrap();

        let added = store.get(id).unwrap();
        assert_eq!(added.color_code, ColorCode::Red);
        assert_eq!(added.brd_notes, "phase one");

        let draft = store.draft();
        assert!(draft.name.is_empty());
        assert!(draft.email.is_empty());
        assert!(draft.deadline.is_none());
        assert_eq!(draft.color_code, ColorCode::Grey);
        assert_eq!(draft.status, ProjectStatus::Pending);
        assert_eq!(draft.approval_status, ApprovalStatus::Pending);
        assert!(draft.brd_notes.is_empty());
        assert_eq!(draft.uat, UatPhase::NotStarted);
        assert_eq!(draft.current_stage, None);
    }

    #[test]
    fn test_update_field_touches_only_target() {
        let mut store = ProjectStore::with_sample();
        let other = add(&mut store, "Alpha");
        let other_before = store.get(other).unwrap().clone();

        assert!(store.update_field(sample_id(), ProjectField::Status(ProjectStatus::Completed)));

        let sample = store.get(sample_id()).unwrap();
        assert_eq!(sample.status, ProjectStatus::Completed);
        assert_eq!(sample.approval_status, ApprovalStatus::Pending);
        assert_eq!(store.get(other).unwrap(), &other_before);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut store = ProjectStore::with_sample();
        let before = store.projects().to_vec();
        let missing = ProjectId::from_raw(999);

        assert!(!store.update_field(missing, ProjectField::Name("x".into())));
        assert!(!store.advance_stage(missing, Stage::GoLive));
        assert!(!store.cycle_uat_status(missing));
        assert!(!store.toggle_selection(missing));
        assert!(!store.upload_brd_file(missing, BrdFile::new("a.pdf", vec![])));

        assert_eq!(store.projects(), before.as_slice());
    }

    #[test]
    fn test_advance_stage_overwrites_from_any_prior_state() {
        let prior_states = [None, Some(Stage::Brd), Some(Stage::Uat), Some(Stage::GoLive)];

        for prior in prior_states {
            for target in Stage::ALL {
                let mut store = ProjectStore::with_sample();
                if let Some(p) = prior {
                    store.advance_stage(sample_id(), p);
                }

                store.advance_stage(sample_id(), target);

                let flags = store.get(sample_id()).unwrap().stages();
                for stage in Stage::ALL {
                    assert_eq!(
                        flags.get(stage),
                        stage.position() <= target.position(),
                        "prior {:?}, target {}, stage {}",
                        prior,
                        target,
                        stage
                    );
                }
            }
        }
    }

    #[test]
    fn test_advance_stage_forward_then_back() {
        let mut store = ProjectStore::with_sample();

        store.advance_stage(sample_id(), Stage::Testing);
        let flags: Vec<bool> = store.get(sample_id()).unwrap().stages().iter().map(|(_, b)| b).collect();
        assert_eq!(flags, vec![true, true, true, false, false]);

        store.advance_stage(sample_id(), Stage::Brd);
        let flags: Vec<bool> = store.get(sample_id()).unwrap().stages().iter().map(|(_, b)| b).collect();
        assert_eq!(flags, vec![true, false, false, false, false]);
    }

    #[test]
    fn test_cycle_uat_status() {
        let mut store = ProjectStore::with_sample();
        let uat = |store: &ProjectStore| {
            let p = store.get(sample_id()).unwrap();
            (p.uat_sign_in(), p.uat_sign_off())
        };

        assert_eq!(uat(&store), (false, false));
        store.cycle_uat_status(sample_id());
        assert_eq!(uat(&store), (true, false));
        store.cycle_uat_status(sample_id());
        assert_eq!(uat(&store), (true, true));
        store.cycle_uat_status(sample_id());
        assert_eq!(uat(&store), (false, false));
    }

    #[test]
    fn test_cycle_uat_period() {
        for start in [UatPhase::NotStarted, UatPhase::SignedIn, UatPhase::Completed] {
            let mut store = ProjectStore::with_sample();
            while store.get(sample_id()).unwrap().uat != start {
                store.cycle_uat_status(sample_id());
            }

            for _ in 0..3 {
                store.cycle_uat_status(sample_id());
                let p = store.get(sample_id()).unwrap();
                assert!(!p.uat_sign_off() || p.uat_sign_in());
            }
            assert_eq!(store.get(sample_id()).unwrap().uat, start);

            // A fourth step lands one phase ahead of the start
            store.cycle_uat_status(sample_id());
            assert_eq!(store.get(sample_id()).unwrap().uat, start.next());
        }
    }

    #[test]
    fn test_upload_brd_file_overwrites() {
        let mut store = ProjectStore::with_sample();

        store.upload_brd_file(sample_id(), BrdFile::new("v1.pdf", vec![1]));
        store.upload_brd_file(sample_id(), BrdFile::new("v2.pdf", vec![2, 2]));

        let file = store.get(sample_id()).unwrap().brd_file.as_ref().unwrap();
        assert_eq!(file.name, "v2.pdf");
        assert_eq!(file.content, vec![2, 2]);
    }

    #[test]
    fn test_toggle_select_all_twice_restores() {
        let mut store = ProjectStore::with_sample();
        add(&mut store, "Alpha");
        add(&mut store, "Beta");

        store.toggle_select_all();
        assert!(store.select_all());
        assert!(store.projects().iter().all(|p| p.selected));

        store.toggle_select_all();
        assert!(!store.select_all());
        assert!(store.projects().iter().all(|p| !p.selected));
    }

    #[test]
    fn test_select_all_overwrites_individual_selection() {
        let mut store = ProjectStore::with_sample();
        let alpha = add(&mut store, "Alpha");

        store.toggle_selection(alpha);
        store.toggle_select_all();

        assert!(store.projects().iter().all(|p| p.selected));
    }

    #[test]
    fn test_toggle_selection_leaves_select_all_flag_stale() {
        // Known behavior: the select-all flag does not track per-row changes.
        let mut store = ProjectStore::with_sample();
        store.toggle_select_all();
        store.toggle_selection(sample_id());

        assert!(store.select_all());
        assert_eq!(store.selected_count(), 0);

        // The next toggle flips the stale flag, so it deselects rather than selects.
        store.toggle_select_all();
        assert!(!store.select_all());
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn test_export_with_empty_selection() {
        let store = ProjectStore::with_sample();
        let mut writer = RecordingWriter::default();

        let result = store.export_selected(&mut writer, "Projects", Path::new("projects.xlsx"));

        assert!(matches!(result, Err(TrackerError::EmptySelection)));
        assert!(writer.written.is_empty());
    }

    #[test]
    fn test_export_selected_subset_in_order() {
        let mut store = ProjectStore::new();
        let p1 = add(&mut store, "P1");
        let p2 = add(&mut store, "P2");
        let p3 = add(&mut store, "P3");
        store.upload_brd_file(p1, BrdFile::new("brd.pdf", vec![9; 16]));
        store.toggle_selection(p1);
        store.toggle_selection(p3);

        let mut writer = RecordingWriter::default();
        let rows = store
            .export_selected(&mut writer, "Projects", Path::new("projects.xlsx"))
            .unwrap();

        assert_eq!(rows, 2);
        assert_eq!(writer.written.len(), 1);
        let (sheet, path) = &writer.written[0];
        assert_eq!(path, Path::new("projects.xlsx"));
        assert_eq!(sheet.name, "Projects");

        // List order is newest first: P3 then P1
        let expected_rows = vec![
            ExportRecord::from(store.get(p3).unwrap()).cells(),
            ExportRecord::from(store.get(p1).unwrap()).cells(),
        ];
        assert_eq!(sheet.rows, expected_rows);
        assert_eq!(sheet.rows[1][0], Cell::Number(p1.as_u64() as f64));
        assert_eq!(sheet.rows[1][1], Cell::Text("P1".into()));
        assert!(!sheet.headers.iter().any(|h| h == "selected" || h == "brdFile"));

        let records = store.selected_records();
        assert!(records.iter().all(|r| r.id != p2.as_u64()));
    }
}
