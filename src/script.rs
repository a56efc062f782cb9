//! Import helper scripts written next to the segment files.
//!
//! Both scripts take `[database] [user] [password]` and load the segment
//! files one by one in numeric order, stopping at the first failure.

use fixture_gen::Segment;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE: &str = "booktalk";
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_PASSWORD: &str = "1234";

pub const SHELL_SCRIPT: &str = "import_all.sh";
pub const BATCH_SCRIPT: &str = "import_all.bat";

fn segment_files() -> impl Iterator<Item = String> {
    Segment::ALL.into_iter().map(|s| format!("{}.sql", s.file_stem()))
}

pub fn shell_script() -> String {
    let mut out = String::new();
    out.push_str("#!/bin/bash\n");
    out.push_str("# Import all fixture SQL files into MySQL\n");
    out.push_str("# Usage: ./import_all.sh [database_name] [mysql_user] [mysql_password]\n\n");
    let _ = writeln!(out, "DB_NAME=\"${{1:-{}}}\"", DEFAULT_DATABASE);
    let _ = writeln!(out, "MYSQL_USER=\"${{2:-{}}}\"", DEFAULT_USER);
    let _ = writeln!(out, "MYSQL_PWD=\"${{3:-{}}}\"", DEFAULT_PASSWORD);
    out.push_str("SCRIPT_DIR=\"$(cd \"$(dirname \"$0\")\" && pwd)\"\n\n");
    out.push_str("echo \"Importing fixtures into database: $DB_NAME\"\n\n");
    out.push_str("for filename in \\\n");
    for file in segment_files() {
        let _ = writeln!(out, "    {} \\", file);
    }
    out.push_str("    ; do\n");
    out.push_str("    echo \"Importing $filename...\"\n");
    out.push_str(
        "    if ! mysql -u \"$MYSQL_USER\" -p\"$MYSQL_PWD\" \"$DB_NAME\" < \"$SCRIPT_DIR/$filename\"; then\n",
    );
    out.push_str("        echo \"  Failed!\"\n");
    out.push_str("        exit 1\n");
    out.push_str("    fi\n");
    out.push_str("    echo \"  Done!\"\n");
    out.push_str("done\n\n");
    out.push_str("echo \"All imports completed successfully!\"\n");
    out
}

pub fn batch_script() -> String {
    let mut out = String::new();
    out.push_str("@echo off\r\n");
    out.push_str("REM Import all fixture SQL files into MySQL\r\n");
    out.push_str("REM Usage: import_all.bat [database_name] [mysql_user] [mysql_password]\r\n\r\n");
    out.push_str("SET DB_NAME=%1\r\n");
    out.push_str("SET MYSQL_USER=%2\r\n");
    out.push_str("SET MYSQL_PWD=%3\r\n");
    let _ = write!(out, "IF \"%DB_NAME%\"==\"\" SET DB_NAME={}\r\n", DEFAULT_DATABASE);
    let _ = write!(out, "IF \"%MYSQL_USER%\"==\"\" SET MYSQL_USER={}\r\n", DEFAULT_USER);
    let _ = write!(out, "IF \"%MYSQL_PWD%\"==\"\" SET MYSQL_PWD={}\r\n\r\n", DEFAULT_PASSWORD);
    out.push_str("echo Importing fixtures into database: %DB_NAME%\r\n\r\n");
    out.push_str("FOR %%f IN (");
    let files: Vec<String> = segment_files().collect();
    out.push_str(&files.join(" "));
    out.push_str(") DO (\r\n");
    out.push_str("    echo Importing %%f...\r\n");
    out.push_str("    mysql -u %MYSQL_USER% -p%MYSQL_PWD% %DB_NAME% < \"%~dp0%%f\"\r\n");
    out.push_str("    IF ERRORLEVEL 1 (\r\n");
    out.push_str("        echo   Failed!\r\n");
    out.push_str("        exit /b 1\r\n");
    out.push_str("    )\r\n");
    out.push_str("    echo   Done!\r\n");
    out.push_str(")\r\n\r\n");
    out.push_str("echo All imports completed successfully!\r\n");
    out
}

/// Write both scripts into `dir`; returns the created paths.
pub fn write_import_scripts(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let sh = dir.join(SHELL_SCRIPT);
    fs::write(&sh, shell_script())?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&sh, fs::Permissions::from_mode(0o755))?;
    }

    let bat = dir.join(BATCH_SCRIPT);
    fs::write(&bat, batch_script())?;

    Ok(vec![sh, bat])
}
