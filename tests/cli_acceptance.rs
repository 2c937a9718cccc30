/// Acceptance tests for the csxdeps binary
///
/// These tests drive the CLI end to end using the fixture scripts in
/// fixtures/scripts/. Every test gets its own cache directory, config
/// directory and working directory.
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to set up a test workspace
struct TestWorkspace {
    temp_dir: TempDir,
    cache_dir: TempDir,
    config_home: TempDir,
    fixtures_dir: PathBuf,
}

impl TestWorkspace {
    fn new() -> Self {
        let project_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

        Self {
            temp_dir: TempDir::new().unwrap(),
            cache_dir: TempDir::new().unwrap(),
            config_home: TempDir::new().unwrap(),
            fixtures_dir: project_root.join("fixtures/scripts"),
        }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn cache_path(&self) -> &Path {
        self.cache_dir.path()
    }

    fn csxdeps(&self) -> Command {
        let mut cmd = Command::new(std::env!("CARGO_BIN_EXE_csxdeps"));
        cmd.current_dir(self.path())
            .env("CSXDEPS_CACHE_DIR", self.cache_path())
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env_remove("CSXDEPS_CONFIG")
            .env_remove("CSXDEPS_TARGET_FRAMEWORK")
            .env_remove("CSXDEPS_LOG_LEVEL")
            .env_remove("RUST_LOG");
        cmd
    }

    fn copy_script(&self, name: &str) -> PathBuf {
        let dest = self.path().join(name);
        fs::copy(self.fixtures_dir.join(name), &dest).unwrap();
        dest
    }

    fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&file_path, content).unwrap();
        file_path
    }

    /// Run a command expected to succeed and return its trimmed stdout
    fn stdout_of(&self, args: &[&str]) -> String {
        let output = self.csxdeps().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "csxdeps {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }
}

#[test]
fn test_project_for_single_script() {
    let ws = TestWorkspace::new();
    ws.copy_script("helpers.csx");
    let script = ws.copy_script("pinned.csx");

    let stdout = ws.stdout_of(&["project", script.to_str().unwrap()]);
    let descriptor = PathBuf::from(&stdout);

    assert!(descriptor.starts_with(ws.cache_path()));
    assert_eq!(descriptor.file_name().unwrap(), "pinned.csproj");
    assert!(stdout.contains("net8.0"));

    let xml = fs::read_to_string(&descriptor).unwrap();
    assert!(xml.contains(r#"<Project Sdk="Microsoft.NET.Sdk">"#));
    assert!(xml.contains("<TargetFramework>net8.0</TargetFramework>"));
    assert!(xml.contains(r#"<PackageReference Include="Dapper" Version="2.1.35" />"#));
    assert!(xml.contains(r#"<PackageReference Include="Newtonsoft.Json" Version="[13.0.3]" />"#));
    // Pulled in through #load
    assert!(xml.contains(r#"<PackageReference Include="Humanizer.Core" Version="2.14.1" />"#));
}

#[test]
fn test_project_uses_sdk_hint() {
    let ws = TestWorkspace::new();
    let script = ws.copy_script("web.csx");

    let stdout = ws.stdout_of(&["project", script.to_str().unwrap()]);
    let xml = fs::read_to_string(stdout).unwrap();
    assert!(xml.contains(r#"<Project Sdk="Microsoft.NET.Sdk.Web">"#));
}

#[test]
fn test_project_framework_from_env() {
    let ws = TestWorkspace::new();
    let script = ws.copy_script("floating.csx");

    let output = ws
        .csxdeps()
        .env("CSXDEPS_TARGET_FRAMEWORK", "net6.0")
        .args(["project", script.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let xml = fs::read_to_string(stdout.trim()).unwrap();
    assert!(xml.contains("<TargetFramework>net6.0</TargetFramework>"));
}

#[test]
fn test_project_missing_version_fails() {
    let ws = TestWorkspace::new();
    let script = ws.copy_script("missing_version.csx");

    ws.csxdeps()
        .args(["project", script.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dapper").and(predicate::str::contains("no version")));
}

#[test]
fn test_project_directory_with_scripts() {
    let ws = TestWorkspace::new();
    ws.copy_script("floating.csx");
    let dir = ws.path().to_str().unwrap().to_string();

    // Scripts alone are enough, no native project needed
    let stdout = ws.stdout_of(&["project", "--dir", &dir]);
    assert!(stdout.ends_with("script.csproj"));
    let xml = fs::read_to_string(stdout).unwrap();
    assert!(xml.contains(r#"<PackageReference Include="Serilog" Version="3.*" />"#));
}

#[test]
fn test_project_directory_without_scripts() {
    let ws = TestWorkspace::new();
    fs::create_dir_all(ws.path().join("empty")).unwrap();
    ws.create_file("native/app.csproj", "<Project Sdk=\"Microsoft.NET.Sdk\" />");

    ws.csxdeps()
        .args(["project", "--dir", "empty"])
        .assert()
        .success()
        .stdout(predicate::str::diff("no project\n"));

    let stdout = ws.stdout_of(&["project", "--dir", "empty", "--allow-without-csproj"]);
    let xml = fs::read_to_string(stdout).unwrap();
    assert!(!xml.contains("PackageReference"));

    let stdout = ws.stdout_of(&["project", "--dir", "native"]);
    let xml = fs::read_to_string(stdout).unwrap();
    assert!(xml.contains("<TargetFramework>net8.0</TargetFramework>"));
    assert!(!xml.contains("PackageReference"));
}

#[test]
fn test_project_relative_directories_get_distinct_projects() {
    let ws = TestWorkspace::new();
    ws.create_file("a/scripts/main.csx", "#r \"nuget: Dapper, 2.1.35\"\n");
    ws.create_file("b/scripts/main.csx", "#r \"nuget: Serilog, 3.1.1\"\n");

    let run_in = |cwd: &str| {
        let output = ws
            .csxdeps()
            .current_dir(ws.path().join(cwd))
            .args(["project", "--dir", "scripts"])
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    };

    let a = run_in("a");
    let b = run_in("b");
    assert_ne!(a, b);
    assert!(fs::read_to_string(&a).unwrap().contains("Dapper"));
    assert!(fs::read_to_string(&b).unwrap().contains("Serilog"));
}

#[test]
fn test_project_directory_explicit_files() {
    let ws = TestWorkspace::new();
    let web = ws.copy_script("web.csx");
    ws.copy_script("floating.csx");
    let dir = ws.path().to_str().unwrap().to_string();

    let stdout = ws.stdout_of(&["project", "--dir", &dir, "--file", web.to_str().unwrap()]);
    let xml = fs::read_to_string(stdout).unwrap();
    assert!(xml.contains("Swashbuckle.AspNetCore"));
    assert!(!xml.contains("Serilog"));
}

#[test]
fn test_inline_code() {
    let ws = TestWorkspace::new();
    ws.copy_script("helpers.csx");

    let stdout = ws.stdout_of(&[
        "inline",
        "--code",
        "#r \"nuget: Dapper, 2.1.35\"\n#load \"helpers.csx\"\n",
        "--name",
        "repl",
    ]);
    assert!(stdout.ends_with("repl.csproj"));

    let xml = fs::read_to_string(stdout).unwrap();
    assert!(xml.contains(r#"Include="Dapper""#));
    assert!(xml.contains(r#"Include="Humanizer.Core""#));
}

#[test]
fn test_hash_pinned_script_is_stable() {
    let ws = TestWorkspace::new();
    ws.copy_script("helpers.csx");
    let script = ws.copy_script("pinned.csx");
    let script = script.to_str().unwrap();

    let first = ws.stdout_of(&["hash", script]);
    let second = ws.stdout_of(&["hash", script]);
    assert_eq!(first, second);
    assert_eq!(first.len(), 64);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit()));

    assert_ne!(first, ws.stdout_of(&["hash", script, "-O", "release"]));
    assert_ne!(first, ws.stdout_of(&["hash", script, "--", "arg"]));
    assert_ne!(first, ws.stdout_of(&["hash", script, "--source", "https://example.com/v3/index.json"]));
    assert_ne!(first, ws.stdout_of(&["hash", script, "--framework", "net6.0"]));
}

#[test]
fn test_hash_changes_with_loaded_file() {
    let ws = TestWorkspace::new();
    ws.copy_script("helpers.csx");
    let script = ws.copy_script("pinned.csx");
    let script = script.to_str().unwrap();

    let before = ws.stdout_of(&["hash", script]);
    ws.create_file(
        "helpers.csx",
        "#r \"nuget: Humanizer.Core, 2.14.1\"\npublic static class Helpers { }\n",
    );
    assert_ne!(before, ws.stdout_of(&["hash", script]));
}

#[test]
fn test_hash_floating_script_is_not_cacheable() {
    let ws = TestWorkspace::new();
    let script = ws.copy_script("floating.csx");

    ws.csxdeps()
        .args(["hash", script.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::diff("not cacheable\n"))
        .stderr(predicate::str::contains("Serilog").and(predicate::str::contains("3.*")));
}

#[test]
fn test_hash_no_cache() {
    let ws = TestWorkspace::new();
    let script = ws.copy_script("floating.csx");

    ws.csxdeps()
        .args(["hash", script.to_str().unwrap(), "--no-cache"])
        .assert()
        .success()
        .stdout(predicate::str::diff("caching disabled\n"));
}

#[test]
fn test_hash_check_reports_miss() {
    let ws = TestWorkspace::new();
    ws.copy_script("helpers.csx");
    let script = ws.copy_script("pinned.csx");

    ws.csxdeps()
        .args(["hash", script.to_str().unwrap(), "--check"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("not cached\n"));
}

#[test]
fn test_entry_points_for_bundled_package() {
    let ws = TestWorkspace::new();
    let package = ws.fixtures_dir.join("bundled");

    let stdout = ws.stdout_of(&["entry-points", package.to_str().unwrap()]);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("main.csx"));
    assert!(lines[0].contains("any"));
}

#[test]
fn test_entry_points_supported_framework_bucket() {
    let ws = TestWorkspace::new();
    ws.create_file("pkg/contentFiles/csx/net45/legacy.csx", "// legacy");
    ws.create_file("pkg/contentFiles/csx/netstandard2.0/other.csx", "// other");
    let package = ws.path().join("pkg");

    let stdout = ws.stdout_of(&[
        "entry-points",
        package.to_str().unwrap(),
        "--supported-framework",
        "net45",
    ]);
    assert!(stdout.ends_with("legacy.csx"));

    let stdout = ws.stdout_of(&["entry-points", package.to_str().unwrap()]);
    assert!(stdout.ends_with("other.csx"));
}

#[test]
fn test_cache_list_and_clean_on_empty_cache() {
    let ws = TestWorkspace::new();

    ws.csxdeps()
        .args(["cache", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached scripts"));

    ws.csxdeps()
        .args(["cache", "clean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 0 cached script(s)"));
}

#[test]
fn test_discovered_config_sets_framework() {
    let ws = TestWorkspace::new();
    ws.create_file("csxdeps.toml", "[project]\ntarget_framework = \"net7.0\"\n");
    let script = ws.copy_script("floating.csx");

    let stdout = ws.stdout_of(&["project", script.to_str().unwrap()]);
    let xml = fs::read_to_string(stdout).unwrap();
    assert!(xml.contains("<TargetFramework>net7.0</TargetFramework>"));
}

#[test]
fn test_discovered_config_is_logged() {
    let ws = TestWorkspace::new();
    ws.create_file("csxdeps.toml", "[project]\ntarget_framework = \"net7.0\"\n");

    ws.csxdeps()
        .args(["--log-level", "debug", "cache", "list"])
        .assert()
        .success()
        .stderr(
            predicate::str::contains("using configuration file")
                .and(predicate::str::contains("csxdeps.toml")),
        );
}

#[test]
fn test_invalid_config_is_reported() {
    let ws = TestWorkspace::new();
    let config = ws.create_file("broken.toml", "[project]\ntarget_framework = \"\"\n");

    ws.csxdeps()
        .args(["config", "validate", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("target_framework"));
}

#[test]
fn test_config_generate_round_trips() {
    let ws = TestWorkspace::new();
    let example = ws.stdout_of(&["config", "generate"]);
    let path = ws.create_file("generated.toml", &example);

    ws.csxdeps()
        .args(["config", "validate", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"));
}
