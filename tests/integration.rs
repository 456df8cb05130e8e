//! Integration tests for DLL bundling against an objdump stand-in.
//!
//! The stand-in prints `<binary>.imports` and fails for binaries without one,
//! which is the textual contract ezgo relies on from `objdump -p`.

#![cfg(unix)]

use std::env::consts::EXE_SUFFIX;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use ezgo::env::CgoEnvironment;
use ezgo::report::RecordingReporter;
use ezgo::{
    bundle_runtime, get_library_dependencies, resolve_and_copy, CopyFailurePolicy,
    ObjdumpInspector, ResolveError, SearchPaths,
};
use tempfile::TempDir;

const FAKE_OBJDUMP: &str = r#"#!/bin/sh
report="$2.imports"
if [ ! -f "$report" ]; then
    echo "objdump: $2: file format not recognized" >&2
    exit 1
fi
echo
echo "$2:     file format pei-x86-64"
echo
while IFS= read -r dll; do
    echo "	DLL Name: $dll"
    echo "	vma:  Hint/Ord Member-Name Bound-To"
done < "$report"
"#;

fn write_tool(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, FAKE_OBJDUMP).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Create a binary at `path` importing `imports`.
fn binary(path: &Path, imports: &[&str]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("MZ {}", path.display())).unwrap();
    let mut report = imports.join("\n");
    report.push('\n');
    fs::write(format!("{}.imports", path.display()), report).unwrap();
}

/// A toolchain environment on disk with the stand-in objdump installed.
fn toolchain(temp: &TempDir) -> CgoEnvironment {
    let env = CgoEnvironment::from_env_path(temp.path().join("env"));
    write_tool(&env.objdump());
    fs::create_dir_all(env.package_bin()).unwrap();
    fs::create_dir_all(&env.tool_bin).unwrap();
    env
}

fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| !n.ends_with(".imports"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_direct_imports_skip_system_dlls() {
    let temp = TempDir::new().unwrap();
    let tool = temp.path().join("objdump");
    write_tool(&tool);
    let app = temp.path().join("app.exe");
    binary(&app, &["foo.dll", "kernel32.dll"]);

    let deps = get_library_dependencies(&app, &tool).unwrap();
    assert_eq!(deps.iter().collect::<Vec<_>>(), vec!["foo.dll"]);
}

#[test]
fn test_tool_failure_is_an_error() {
    let temp = TempDir::new().unwrap();
    let tool = temp.path().join("objdump");
    write_tool(&tool);

    let err = get_library_dependencies(&temp.path().join("not-a-binary"), &tool).unwrap_err();
    match err {
        ResolveError::ToolFailed { code, stderr, .. } => {
            assert_eq!(code, Some(1));
            assert!(stderr.contains("file format not recognized"), "{stderr}");
        }
        other => panic!("expected ToolFailed, got {other:?}"),
    }
}

#[test]
fn test_resolve_and_copy_bundles_closure() {
    let temp = TempDir::new().unwrap();
    let env = toolchain(&temp);
    binary(&env.package_bin().join("glfw3.dll"), &["libwinpthread-1.dll", "GDI32.dll"]);
    binary(&env.tool_bin.join("libwinpthread-1.dll"), &["msvcrt.dll"]);
    binary(&env.tool_bin.join("libgcc_s_seh-1.dll"), &["libwinpthread-1.dll"]);
    let app = temp.path().join("project/app.exe");
    binary(&app, &["glfw3.dll", "libgcc_s_seh-1.dll", "KERNEL32.dll"]);

    resolve_and_copy(&app, &env, true, false).unwrap();

    assert_eq!(
        dir_listing(app.parent().unwrap()),
        vec!["app.exe", "glfw3.dll", "libgcc_s_seh-1.dll", "libwinpthread-1.dll"]
    );
}

#[test]
fn test_resolve_and_copy_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let env = toolchain(&temp);
    binary(&env.package_bin().join("a.dll"), &["b.dll"]);
    binary(&env.tool_bin.join("b.dll"), &["a.dll"]);
    let app = temp.path().join("project/app.exe");
    binary(&app, &["a.dll"]);

    resolve_and_copy(&app, &env, true, false).unwrap();
    let first: Vec<Vec<u8>> = ["a.dll", "b.dll"]
        .iter()
        .map(|n| fs::read(app.with_file_name(n)).unwrap())
        .collect();

    resolve_and_copy(&app, &env, true, false).unwrap();
    let second: Vec<Vec<u8>> = ["a.dll", "b.dll"]
        .iter()
        .map(|n| fs::read(app.with_file_name(n)).unwrap())
        .collect();

    assert_eq!(first, second);
    assert_eq!(first[0], fs::read(env.package_bin().join("a.dll")).unwrap());
}

#[test]
fn test_package_dlls_shadow_toolchain_dlls() {
    let temp = TempDir::new().unwrap();
    let env = toolchain(&temp);
    binary(&env.package_bin().join("zlib1.dll"), &[]);
    binary(&env.tool_bin.join("zlib1.dll"), &[]);
    fs::write(env.tool_bin.join("zlib1.dll"), "toolchain build").unwrap();
    let app = temp.path().join("project/app.exe");
    binary(&app, &["zlib1.dll"]);

    resolve_and_copy(&app, &env, true, false).unwrap();

    assert_eq!(
        fs::read(app.with_file_name("zlib1.dll")).unwrap(),
        fs::read(env.package_bin().join("zlib1.dll")).unwrap()
    );
}

#[test]
fn test_unreadable_and_missing_dependencies_are_warnings() {
    let temp = TempDir::new().unwrap();
    let tool = temp.path().join("objdump");
    write_tool(&tool);
    let bin = temp.path().join("bin");
    binary(&bin.join("good.dll"), &["leaf.dll"]);
    binary(&bin.join("leaf.dll"), &[]);
    // Present on disk but not dumpable.
    fs::write(bin.join("opaque.dll"), "not a PE file").unwrap();
    let app = temp.path().join("out/app.exe");
    binary(&app, &["good.dll", "opaque.dll", "absent.dll"]);

    let reporter = RecordingReporter::new();
    let required = bundle_runtime(
        &app,
        &SearchPaths::new([&bin]),
        &ObjdumpInspector::new(&tool),
        &reporter,
        CopyFailurePolicy::Abort,
    )
    .unwrap();

    assert_eq!(
        required.iter().collect::<Vec<_>>(),
        vec!["absent.dll", "good.dll", "leaf.dll", "opaque.dll"]
    );
    assert_eq!(reporter.inspect_failures(), vec!["opaque.dll".to_string()]);
    assert_eq!(
        reporter.unlocated(),
        vec!["absent.dll".to_string(), "absent.dll".to_string()]
    );
    assert_eq!(
        dir_listing(app.parent().unwrap()),
        vec!["app.exe", "good.dll", "leaf.dll", "opaque.dll"]
    );
}

#[test]
fn test_unreadable_output_is_fatal() {
    let temp = TempDir::new().unwrap();
    let env = toolchain(&temp);
    let app: PathBuf = temp.path().join("project/app.exe");
    fs::create_dir_all(app.parent().unwrap()).unwrap();
    fs::write(&app, "garbage").unwrap();

    let result = resolve_and_copy(&app, &env, true, false);
    assert!(matches!(result, Err(ResolveError::ToolFailed { .. })));
}

#[test]
fn test_objdump_path_follows_platform_suffix() {
    let env = CgoEnvironment::from_env_path("/env");
    assert!(env
        .objdump()
        .to_string_lossy()
        .ends_with(&format!("objdump{EXE_SUFFIX}")));
}
