use chrono::{Local, NaiveDate};
use std::fmt;

/// Unique identifier of a project.
///
/// Ids are derived from the creation time in milliseconds; the store guarantees
/// they are strictly increasing so two projects never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId(u64);

impl ProjectId {
    pub fn from_raw(raw: u64) -> Self {
        ProjectId(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Pending,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Pending,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
    ];

    /// Value written to exported sheets
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Pending => write!(f, "Pending"),
            ProjectStatus::InProgress => write!(f, "In Progress"),
            ProjectStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Approval state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub const ALL: [ApprovalStatus; 3] = [
        ApprovalStatus::Pending,
        ApprovalStatus::Approved,
        ApprovalStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "Pending"),
            ApprovalStatus::Approved => write!(f, "Approved"),
            ApprovalStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Manually assigned color tag. Never derived from dates or status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    Red,
    Green,
    Grey,
    Yellow,
    Orange,
}

impl ColorCode {
    pub const ALL: [ColorCode; 5] = [
        ColorCode::Red,
        ColorCode::Green,
        ColorCode::Grey,
        ColorCode::Yellow,
        ColorCode::Orange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorCode::Red => "red",
            ColorCode::Green => "green",
            ColorCode::Grey => "grey",
            ColorCode::Yellow => "yellow",
            ColorCode::Orange => "orange",
        }
    }

    /// Human label shown next to the color
    pub fn label(&self) -> &'static str {
        match self {
            ColorCode::Red => "Deadline Exceeded",
            ColorCode::Green => "Ongoing",
            ColorCode::Grey => "New Project",
            ColorCode::Yellow => "Urgent",
            ColorCode::Orange => "Near Deadline",
        }
    }
}

impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// BRD requirement level.
///
/// `Required` and `RequiredLower` differ only in casing of the stored value;
/// both are kept because exported sheets carry the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrdRequirement {
    Required,
    RequiredLower,
    NotRequired,
}

impl BrdRequirement {
    pub const ALL: [BrdRequirement; 3] = [
        BrdRequirement::Required,
        BrdRequirement::RequiredLower,
        BrdRequirement::NotRequired,
    ];

    /// Raw stored value
    pub fn as_str(&self) -> &'static str {
        match self {
            BrdRequirement::Required => "Required",
            BrdRequirement::RequiredLower => "required",
            BrdRequirement::NotRequired => "Not Required",
        }
    }

    /// Project level presented when picking the requirement
    pub fn level_label(&self) -> &'static str {
        match self {
            BrdRequirement::Required => "Low Level Project",
            BrdRequirement::RequiredLower => "Medium Level Project",
            BrdRequirement::NotRequired => "High Level Project",
        }
    }
}

impl fmt::Display for BrdRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level_label())
    }
}

/// Delivery milestone, in fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Brd,
    Develop,
    Testing,
    Uat,
    GoLive,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Brd,
        Stage::Develop,
        Stage::Testing,
        Stage::Uat,
        Stage::GoLive,
    ];

    /// Position in the delivery order, starting at 0
    pub fn position(&self) -> usize {
        match self {
            Stage::Brd => 0,
            Stage::Develop => 1,
            Stage::Testing => 2,
            Stage::Uat => 3,
            Stage::GoLive => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Brd => "BRD",
            Stage::Develop => "Develop",
            Stage::Testing => "Testing",
            Stage::Uat => "UAT",
            Stage::GoLive => "GoLive",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Boolean view of stage progress, one flag per stage.
///
/// Built from the furthest stage reached, so the flags are always
/// prefix-closed in stage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageFlags {
    flags: [bool; 5],
}

impl StageFlags {
    pub fn up_to(current: Option<Stage>) -> Self {
        let mut flags = [false; 5];
        if let Some(stage) = current {
            for flag in flags.iter_mut().take(stage.position() + 1) {
                *flag = true;
            }
        }
        Self { flags }
    }

    pub fn get(&self, stage: Stage) -> bool {
        self.flags[stage.position()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, bool)> + '_ {
        Stage::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

/// UAT progress: sign in, then sign off, then back to the start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UatPhase {
    #[default]
    NotStarted,
    SignedIn,
    Completed,
}

impl UatPhase {
    /// Next phase in the cycle
    pub fn next(self) -> Self {
        match self {
            UatPhase::NotStarted => UatPhase::SignedIn,
            UatPhase::SignedIn => UatPhase::Completed,
            UatPhase::Completed => UatPhase::NotStarted,
        }
    }

    pub fn sign_in(&self) -> bool {
        !matches!(self, UatPhase::NotStarted)
    }

    pub fn sign_off(&self) -> bool {
        matches!(self, UatPhase::Completed)
    }

    /// Label of the button that advances the cycle
    pub fn action_label(&self) -> &'static str {
        match self {
            UatPhase::NotStarted => "Sign In",
            UatPhase::SignedIn => "Sign Off",
            UatPhase::Completed => "Completed",
        }
    }
}

/// Business requirements document attached to a project
#[derive(Clone, PartialEq, Eq)]
pub struct BrdFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl BrdFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// Lowercased extension without the dot, if the name has one
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    pub fn is_accepted(&self, extensions: &[String]) -> bool {
        match self.extension() {
            Some(ext) => extensions.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext)),
            None => false,
        }
    }
}

impl fmt::Debug for BrdFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrdFile")
            .field("name", &self.name)
            .field("size", &self.content.len())
            .finish()
    }
}

/// One updatable field with its new value
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectField {
    Name(String),
    Email(String),
    AssignedDate(NaiveDate),
    Deadline(NaiveDate),
    Status(ProjectStatus),
    ApprovalStatus(ApprovalStatus),
    ColorCode(ColorCode),
    BrdRequirement(BrdRequirement),
    BrdNotes(String),
    BrdFile(Option<BrdFile>),
}

impl ProjectField {
    /// Field name as it appears in exported headers
    pub fn name(&self) -> &'static str {
        match self {
            ProjectField::Name(_) => "name",
            ProjectField::Email(_) => "email",
            ProjectField::AssignedDate(_) => "assignedDate",
            ProjectField::Deadline(_) => "deadline",
            ProjectField::Status(_) => "status",
            ProjectField::ApprovalStatus(_) => "approvalStatus",
            ProjectField::ColorCode(_) => "colorCode",
            ProjectField::BrdRequirement(_) => "brdRequirement",
            ProjectField::BrdNotes(_) => "brdNotes",
            ProjectField::BrdFile(_) => "brdFile",
        }
    }

    /// Only BRD notes and the BRD file are open to every role
    pub fn is_admin_only(&self) -> bool {
        !matches!(self, ProjectField::BrdNotes(_) | ProjectField::BrdFile(_))
    }
}

/// A tracked project
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub email: String,
    pub assigned_date: NaiveDate,
    pub deadline: NaiveDate,
    pub status: ProjectStatus,
    pub approval_status: ApprovalStatus,
    pub color_code: ColorCode,
    pub brd_requirement: BrdRequirement,
    pub brd_notes: String,
    pub brd_file: Option<BrdFile>,
    /// Furthest stage reached, if any
    pub current_stage: Option<Stage>,
    pub uat: UatPhase,
    pub selected: bool,
}

impl Project {
    /// Builds a project from a draft. A draft without a deadline is handed back unchanged.
    pub fn from_draft(id: ProjectId, draft: ProjectDraft) -> Result<Self, ProjectDraft> {
        let Some(deadline) = draft.deadline else {
            return Err(draft);
        };
        Ok(Self {
            id,
            name: draft.name,
            email: draft.email,
            assigned_date: draft.assigned_date,
            deadline,
            status: draft.status,
            approval_status: draft.approval_status,
            color_code: draft.color_code,
            brd_requirement: draft.brd_requirement,
            brd_notes: draft.brd_notes,
            brd_file: draft.brd_file,
            current_stage: draft.current_stage,
            uat: draft.uat,
            selected: draft.selected,
        })
    }

    /// The dashboard's initial sample project
    pub fn sample() -> Self {
        Self {
            id: ProjectId::from_raw(1),
            name: "Sample Project".to_string(),
            email: "project.manager@emaar.ae".to_string(),
            assigned_date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap_or_default(),
            deadline: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default(),
            status: ProjectStatus::Pending,
            approval_status: ApprovalStatus::Pending,
            color_code: ColorCode::Grey,
            brd_requirement: BrdRequirement::Required,
            brd_notes: String::new(),
            brd_file: None,
            current_stage: None,
            uat: UatPhase::NotStarted,
            selected: false,
        }
    }

    pub fn stages(&self) -> StageFlags {
        StageFlags::up_to(self.current_stage)
    }

    pub fn uat_sign_in(&self) -> bool {
        self.uat.sign_in()
    }

    pub fn uat_sign_off(&self) -> bool {
        self.uat.sign_off()
    }

    /// Replaces exactly one field
    pub fn apply(&mut self, field: ProjectField) {
        match field {
            ProjectField::Name(v) => self.name = v,
            ProjectField::Email(v) => self.email = v,
            ProjectField::AssignedDate(v) => self.assigned_date = v,
            ProjectField::Deadline(v) => self.deadline = v,
            ProjectField::Status(v) => self.status = v,
            ProjectField::ApprovalStatus(v) => self.approval_status = v,
            ProjectField::ColorCode(v) => self.color_code = v,
            ProjectField::BrdRequirement(v) => self.brd_requirement = v,
            ProjectField::BrdNotes(v) => self.brd_notes = v,
            ProjectField::BrdFile(v) => self.brd_file = v,
        }
    }
}

/// The "new project" form awaiting submission
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub email: String,
    pub assigned_date: NaiveDate,
    pub deadline: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub approval_status: ApprovalStatus,
    pub color_code: ColorCode,
    pub brd_requirement: BrdRequirement,
    pub brd_notes: String,
    pub brd_file: Option<BrdFile>,
    pub current_stage: Option<Stage>,
    pub uat: UatPhase,
    pub selected: bool,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            assigned_date: Local::now().date_naive(),
            deadline: None,
            status: ProjectStatus::Pending,
            approval_status: ApprovalStatus::Pending,
            color_code: ColorCode::Grey,
            brd_requirement: BrdRequirement::Required,
            brd_notes: String::new(),
            brd_file: None,
            current_stage: None,
            uat: UatPhase::NotStarted,
            selected: false,
        }
    }
}

impl ProjectDraft {
    /// Names of required fields that are still empty
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.email.is_empty() {
            missing.push("email");
        }
        if self.deadline.is_none() {
            missing.push("deadline");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required_fields().is_empty()
    }

    pub fn apply(&mut self, field: ProjectField) {
        match field {
            ProjectField::Name(v) => self.name = v,
            ProjectField::Email(v) => self.email = v,
            ProjectField::AssignedDate(v) => self.assigned_date = v,
            ProjectField::Deadline(v) => self.deadline = Some(v),
            ProjectField::Status(v) => self.status = v,
            ProjectField::ApprovalStatus(v) => self.approval_status = v,
            ProjectField::ColorCode(v) => self.color_code = v,
            ProjectField::BrdRequirement(v) => self.brd_requirement = v,
            ProjectField::BrdNotes(v) => self.brd_notes = v,
            ProjectField::BrdFile(v) => self.brd_file = v,
        }
    }
}
