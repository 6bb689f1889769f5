pub mod attendance;
pub mod backup;
pub mod checklist;
pub mod config;
pub mod device;
pub mod emergency;
pub mod init;
pub mod log;
pub mod masters;
pub mod session;
pub mod transfer;
pub mod venue;

use crate::export::ReportTable;
use crate::ui::messages::info;
use crate::utils::table::Table;

/// Print a report as a terminal table, or `empty` when it has no rows.
pub(crate) fn print_report(report: &ReportTable, empty: &str) {
    if report.is_empty() {
        info(empty);
        return;
    }
    let mut t = Table::new(&report.headers[..]);
    for row in &report.rows {
        t.add_row(row.clone());
    }
    print!("{}", t.render());
}
