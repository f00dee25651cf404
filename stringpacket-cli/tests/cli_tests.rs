use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn stringpacket_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("stringpacket"))
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn seed(root: &Path) {
    write(
        root,
        "en/Android/strings.xml",
        r#"<resources>
    <string name="ok">OK</string>
    <string name="wait">Don\'t leave</string>
</resources>
"#,
    );
    write(root, "en/iOS/Localizable.strings", "\"OK\" = \"OK\";\n");
}

#[test]
fn test_build_worksheet_in_directory() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());

    let output = stringpacket_cmd()
        .args(["build-worksheet", dir.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wrote 2 rows"), "stdout: {}", stdout);

    let tsv = fs::read_to_string(dir.path().join("TranslationPacket.tsv")).unwrap();
    assert_eq!(tsv.lines().count(), 3);
    assert!(tsv.contains("\t\tstrings.xml\tok\tLocalizable.strings\t\tOK\t\t\n"));
    assert!(tsv.contains("Don’t leave"));
}

#[test]
fn test_build_worksheet_defaults_to_current_directory() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());

    let output = stringpacket_cmd()
        .current_dir(dir.path())
        .arg("build-worksheet")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(dir.path().join("TranslationPacket.tsv").exists());
}

#[test]
fn test_import_deliverable_writes_locale_files() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    write(
        dir.path(),
        "es.html",
        "<table>\
         <tr><td>Android path</td><td>Android name</td><td>iOS path</td><td>iOS name</td><td>English</td><td>Translation</td><td>Comments</td></tr>\
         <tr><td>strings.xml</td><td>ok</td><td>Localizable.strings</td><td></td><td>OK</td><td>Vale</td><td></td></tr>\
         </table>",
    );

    let output = stringpacket_cmd()
        .args(["import-deliverable", dir.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let android = fs::read_to_string(dir.path().join("es/Android/strings.xml")).unwrap();
    assert!(android.contains(r#"<string name="ok">Vale</string>"#));
    let ios = fs::read_to_string(dir.path().join("es/iOS/Localizable.strings")).unwrap();
    assert!(ios.contains(r#""OK" = "Vale";"#));
}

#[test]
fn test_import_single_tsv_with_locale() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    write(
        dir.path(),
        "returned.tsv",
        "Android path\tAndroid name\tEnglish\tTranslation\tComment\nstrings.xml\tok\tOK\tD'accord\t\n",
    );

    let output = stringpacket_cmd()
        .args([
            "import-deliverable",
            dir.path().to_str().unwrap(),
            "--input",
            dir.path().join("returned.tsv").to_str().unwrap(),
            "--locale",
            "fr",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let android = fs::read_to_string(dir.path().join("fr/Android/strings.xml")).unwrap();
    assert!(android.contains("D'accord"));
}

#[test]
fn test_malformed_deliverable_fails() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    write(dir.path(), "de.html", "<table><tr><td>English</td></tr></table>");

    let output = stringpacket_cmd()
        .args(["import-deliverable", dir.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error importing"), "stderr: {}", stderr);
    assert!(stderr.contains("malformed table"), "stderr: {}", stderr);
}

#[test]
fn test_clean_source() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());

    let output = stringpacket_cmd()
        .args(["clean-source", dir.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let android = fs::read_to_string(dir.path().join("en/Android/strings.xml")).unwrap();
    assert!(android.contains("Don’t leave"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Cleaned 1 of 2 files"));
}

#[test]
fn test_scan_source() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "Sources/Feature/View.swift",
        "Text(\"Hello there\")\nButton(\"Continue\") {}\n",
    );

    let output = stringpacket_cmd()
        .args(["scan-source", dir.path().to_str().unwrap(), "--locale", "en"])
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let strings =
        fs::read_to_string(dir.path().join("Resources/en.lproj/Localizable.strings")).unwrap();
    assert!(strings.contains("\"Hello there\" = \"Hello there\";"));
    assert!(strings.contains("\"Continue\" = \"Continue\";"));
}

#[test]
fn test_missing_directory_fails() {
    let output = stringpacket_cmd()
        .args(["build-worksheet", "/definitely/not/here"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Directory does not exist"));
}

#[test]
fn test_config_flag() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    let config = dir.path().join("custom.toml");
    fs::write(&config, "worksheet_file_name = \"Packet.tsv\"\n").unwrap();

    let output = stringpacket_cmd()
        .args([
            "build-worksheet",
            dir.path().to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(dir.path().join("Packet.tsv").exists());
}
