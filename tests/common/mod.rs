#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

pub const COLUMNS_SHEET: &str = "\
table_name,column_name,display_name,multiple_values,directory_column_order,directory_download,directory_display,dashboard_filter,dashboard_pie_dropdown,dashboard_bar_dropdown
Organizations,Organization,Organization,No,1,Yes,Yes,No,,
Organizations,City,City,No,2,Yes,Yes,No,,
Organizations,Sector,Sector served,Yes,3,Yes,Yes,Yes,1,1
Organizations,Theme,Program theme,Yes,4,No,Yes,Yes,2,2
Organizations,Education_Service_Center,Service region,No,5,No,No,Yes,,3
Organizations,Notes,Internal notes,No,0,No,No,No,,
Programs,Sector,Sector,Yes,1,No,No,Yes,,
";

pub const TERMS_SHEET: &str = "\
table_name,column_name,term,display_term,term_order
Organizations,Sector,k12,K-12 education,1
Organizations,Sector,higher_ed,Higher education,2
Organizations,Sector,community,Community,3
Organizations,Theme,climate,Climate,1
Organizations,Theme,water,Water,2
Organizations,Education_Service_Center,Region 1,Region 1,1
Organizations,Education_Service_Center,Region 13,Region 13,2
";

/// Five raw rows; row 2 has no organization name and never becomes a record,
/// so the loaded ids are 1, 3, 4, 5.
pub const RECORDS_SHEET: &str = "\
Organization,City,Sector,Theme,Education_Service_Center,Latitude ,Longitude ,Notes
\"Alpha Learning\",\"Austin\",\"k12, community\",\"climate\",\"Region 13\",\"30.27\",\"-97.74\",\"a\"
\"\",\"Nowhere\",\"k12\",\"\",\"Region 1\",\"\",\"\",\"\"
\"Bravo Institute\",\"Dallas\",\"higher_ed, k12\",\"climate, water\",\"Region 1\",\"32.78\",\"-96.80\",\"\"
\"Charlie Center\",\"Austin\",\"community\",\"\",\"Region 13\",\"\",\"\",\"\"
\"Delta Org\",\"\",\"k12\",\"water\",\"\",\"29.40\",\"-98.50\",\"\"
";

/// Writes the three fixture sheets as per-sheet CSV files under `dir`.
pub fn write_fixture_sheets(dir: &Path) {
    let write = |name: &str, contents: &str| {
        std::fs::write(dir.join(name), contents).expect("write fixture sheet");
    };
    write("columns_dictionary.csv", COLUMNS_SHEET);
    write("terms_dictionary.csv", TERMS_SHEET);
    write("Organizations.csv", RECORDS_SHEET);
}

/// Builds a workspace holding the standard fixture sheets.
pub fn fixture_workspace() -> TestWorkspace {
    let workspace = TestWorkspace::new();
    write_fixture_sheets(workspace.path());
    workspace
}
