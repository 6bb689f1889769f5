use crate::export::{ExportFormat, ExportKind};
use crate::import::ImportKind;
use crate::models::checklist::ChecklistType;
use crate::models::device::{DeviceAction, DeviceType};
use clap::{Parser, Subcommand};

/// Command-line interface definition for vbsa
/// Exam venue staffing, attendance and device logistics backed by SQLite
#[derive(Parser)]
#[command(
    name = "vbsa",
    version = env!("CARGO_PKG_VERSION"),
    about = "Exam venue staffing and device logistics: sessions, attendance, device allocation and checklists",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Subproject whose venues, sessions and records are used
    #[arg(global = true, long = "project", short = 'p')]
    pub project: Option<String>,

    /// Pretend the current time is this instant ("YYYY-MM-DD HH:MM")
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

pub fn parse_device_type(s: &str) -> Result<DeviceType, String> {
    DeviceType::from_name(s).ok_or_else(|| {
        format!("unknown device type '{s}' (biometric, cctv, hhmd, jammer, laptop)")
    })
}

pub fn parse_checklist(s: &str) -> Result<ChecklistType, String> {
    ChecklistType::from_name(s).ok_or_else(|| format!("unknown checklist '{s}' (1 or 2)"))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Write defaults for missing configuration fields")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/vim/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Compress the backup into a .zip")]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// List subprojects with stored data
    Project {
        #[command(subcommand)]
        action: ProjectCmd,
    },

    /// Partner / vendor master
    Vendor {
        #[command(subcommand)]
        action: VendorCmd,
    },

    /// Registered staff master
    User {
        #[command(subcommand)]
        action: UserCmd,
    },

    /// Manpower role master
    Role {
        #[command(subcommand)]
        action: NamedCmd,
    },

    /// Asset type master
    AssetType {
        #[command(subcommand)]
        action: NamedCmd,
    },

    /// Exam venues of the current subproject
    Venue {
        #[command(subcommand)]
        action: VenueCmd,
    },

    /// Assign partners and users to venues
    Map {
        #[command(subcommand)]
        action: MapCmd,
    },

    /// Session templates, exam dates and per-date overrides
    Session {
        #[command(subcommand)]
        action: SessionCmd,
    },

    /// Device catalog, requirements, mapping and logistics
    Device {
        #[command(subcommand)]
        action: DeviceCmd,
    },

    /// Mark attendance and release devices
    Attendance {
        #[command(subcommand)]
        action: AttendanceCmd,
    },

    /// Venue checklists per session
    Checklist {
        #[command(subcommand)]
        action: ChecklistCmd,
    },

    /// Short-lived emergency registrations
    Emergency {
        #[command(subcommand)]
        action: EmergencyCmd,
    },

    /// Write a CSV import template (header plus one sample row)
    Template {
        #[arg(long, value_enum)]
        kind: ImportKind,

        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Bulk import rows from a CSV file
    Import {
        #[arg(long, value_enum)]
        kind: ImportKind,

        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Export a report
    Export {
        #[arg(long, value_enum)]
        what: ExportKind,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ProjectCmd {
    List,
}

#[derive(Subcommand)]
pub enum VendorCmd {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        partner_type: String,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        phone: String,
    },
    List,
    Del {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum UserCmd {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        mobile: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        role: String,
        #[arg(long, default_value = "", help = "Vendor id the user belongs to")]
        partner: String,
    },
    List,
    /// Mark a user as verified
    Verify {
        id: String,
    },
    Del {
        id: String,
    },
}

/// Masters that only carry a name and a description.
#[derive(Subcommand)]
pub enum NamedCmd {
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    List,
    Del {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum VenueCmd {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long, default_value_t = 0)]
        candidates: u32,
        #[arg(long = "lab", help = "Lab name (repeatable)")]
        labs: Vec<String>,
    },
    List,
}

#[derive(Subcommand)]
pub enum MapCmd {
    /// Map a partner to one or more venues
    Partner {
        #[arg(long)]
        partner: String,
        #[arg(long = "venue", required = true)]
        venues: Vec<String>,
    },
    /// Map a user to one or more venues
    User {
        #[arg(long)]
        user: String,
        #[arg(long = "venue", required = true)]
        venues: Vec<String>,
    },
    List,
}

#[derive(Subcommand)]
pub enum SessionCmd {
    /// Add a session template applied to every exam date
    AddTemplate {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        label: Option<String>,
    },
    /// Change a template's default times
    EditTemplate {
        id: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Select exam dates (YYYY-MM-DD or YYYY-MM-DD:YYYY-MM-DD)
    Dates {
        #[arg(required = true)]
        dates: Vec<String>,
        #[arg(long, help = "Remove the dates instead of adding them")]
        remove: bool,
    },
    /// Change one template on one date only
    Override {
        date: String,
        template: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, conflicts_with = "enable")]
        disable: bool,
        #[arg(long)]
        enable: bool,
    },
    List {
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum DeviceCmd {
    /// Browse the device master catalog
    Catalog {
        #[arg(long = "type", value_parser = parse_device_type)]
        device_type: Option<DeviceType>,
        #[arg(long)]
        partner: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Required, buffer and received counts per venue and device type
    Requirements {
        #[arg(long)]
        venue: Option<String>,
    },
    /// Pin the buffer of one requirement row
    Buffer {
        venue: String,
        #[arg(value_parser = parse_device_type)]
        device_type: DeviceType,
        #[arg(required_unless_present = "reset")]
        value: Option<u32>,
        #[arg(long, help = "Go back to the percentage buffer")]
        reset: bool,
    },
    /// Map catalog devices to a venue
    Map {
        venue: String,
        #[arg(required = true)]
        device_ids: Vec<String>,
    },
    /// Remove a mapped device
    Unmap {
        device_id: String,
        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
    /// Devices mapped in this subproject
    Mapped {
        #[arg(long)]
        venue: Option<String>,
    },
    /// Allocation list for a user: devices held by others are disabled
    Available {
        #[arg(long)]
        venue: String,
        #[arg(long = "type", value_parser = parse_device_type)]
        device_type: DeviceType,
        #[arg(long)]
        user: String,
    },
    /// Log devices sent to or received at a venue
    Activity {
        #[arg(value_enum)]
        action: DeviceAction,
        #[arg(long)]
        venue: String,
        #[arg(long = "type", value_parser = parse_device_type)]
        device_type: DeviceType,
        #[arg(long)]
        qty: u32,
        #[arg(long, default_value = "")]
        remarks: String,
    },
    Activities {
        #[arg(long)]
        venue: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AttendanceCmd {
    /// Mark a user present and issue a device
    Mark {
        #[arg(long)]
        user: String,
        #[arg(long)]
        session: String,
        #[arg(long)]
        venue: String,
        #[arg(long = "lab", help = "Lab name (repeatable; several only for a Server Manager)")]
        labs: Vec<String>,
        #[arg(long = "type", value_parser = parse_device_type)]
        device_type: Option<DeviceType>,
        #[arg(long)]
        device: Option<String>,
        #[arg(long, help = "Captured face photo file")]
        photo: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Release the devices of the given users in one session
    Deallocate {
        #[arg(long)]
        session: String,
        #[arg(long = "user", required = true)]
        users: Vec<String>,
    },
    List {
        #[arg(long)]
        session: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ChecklistCmd {
    Status {
        #[arg(long)]
        session: Option<String>,
    },
    Submit {
        #[arg(long)]
        session: String,
        #[arg(long, value_parser = parse_checklist)]
        checklist: ChecklistType,
        #[arg(long = "field", help = "Form field as key=value (repeatable)")]
        fields: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum EmergencyCmd {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        aadhar: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        partner: String,
        #[arg(long)]
        photo: Option<String>,
    },
    List {
        #[arg(long, help = "Include expired registrations")]
        all: bool,
    },
}
