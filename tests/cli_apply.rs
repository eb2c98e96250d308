mod harness;

use harness::TestContext;
use predicates::prelude::*;
use std::fs;

const SVC: &str = r#"
[[job]]
name = "svc"
label = "com.example.svc"
program_arguments = ["/usr/local/bin/svc", "--foo"]
run_at_load = true
"#;

#[test]
fn apply_writes_and_validates_new_plist() {
    let ctx = TestContext::new();
    let manifest = ctx.write_manifest("svc.toml", SVC);

    ctx.apply(&manifest).success().stdout(predicate::str::contains("Wrote com.example.svc"));

    let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">
<plist version=\"1.0\">
<dict>
\t<key>Label</key>
\t<string>com.example.svc</string>
\t<key>ProgramArguments</key>
\t<array>
\t\t<string>/usr/local/bin/svc</string>
\t\t<string>--foo</string>
\t</array>
\t<key>RunAtLoad</key>
\t<true/>
</dict>
</plist>
";
    assert_eq!(ctx.read_plist("svc.plist"), expected);

    let log = ctx.plutil().get_log();
    assert!(log.contains("-lint"), "validator was not invoked: {log}");
    assert!(log.contains("svc.plist"));
}

#[test]
fn second_apply_is_unchanged() {
    let ctx = TestContext::new();
    let manifest = ctx.write_manifest("svc.toml", SVC);

    ctx.apply(&manifest).success();
    let first = fs::metadata(ctx.agents_dir().join("svc.plist")).unwrap().modified().unwrap();

    ctx.apply(&manifest).success().stdout(predicate::str::contains("unchanged"));
    let second = fs::metadata(ctx.agents_dir().join("svc.plist")).unwrap().modified().unwrap();

    assert_eq!(first, second);
    assert_eq!(ctx.plutil().get_log().lines().count(), 1);
}

#[test]
fn apply_merges_into_existing_plist() {
    let ctx = TestContext::new();
    fs::create_dir_all(ctx.agents_dir()).unwrap();
    fs::write(
        ctx.agents_dir().join("svc.plist"),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<plist version=\"1.0\">\n<dict>\n\t<key>Label</key>\n\t<string>com.example.svc</string>\n\t<key>Debug</key>\n\t<true/>\n</dict>\n</plist>\n",
    )
    .unwrap();
    let manifest = ctx.write_manifest("svc.toml", SVC);

    ctx.apply(&manifest).success();

    let plist = ctx.read_plist("svc.plist");
    assert!(plist.contains("\t<key>Debug</key>\n\t<true/>\n"));
    assert!(plist.contains("\t<key>RunAtLoad</key>\n\t<true/>\n"));
}

#[test]
fn existing_plist_with_mistyped_key_is_left_alone() {
    let ctx = TestContext::new();
    fs::create_dir_all(ctx.agents_dir()).unwrap();
    let existing = "<plist version=\"1.0\">\n<dict>\n\t<key>Label</key>\n\t<string>com.example.svc</string>\n\t<key>Nice</key>\n\t<string>x</string>\n</dict>\n</plist>\n";
    fs::write(ctx.agents_dir().join("svc.plist"), existing).unwrap();
    let manifest = ctx.write_manifest("svc.toml", SVC);

    ctx.apply(&manifest)
        .failure()
        .stderr(predicate::str::contains("cannot be merged"))
        .stderr(predicate::str::contains("Key: Nice"));

    assert_eq!(ctx.read_plist("svc.plist"), existing);
}

#[test]
fn sparse_calendar_intervals_are_written_once() {
    let ctx = TestContext::new();
    let manifest = ctx.write_manifest(
        "svc.toml",
        r#"
[[job]]
name = "svc"
program_arguments = ["/bin/svc"]

[[job.start_calendar_interval]]
index = 2
hour = 3
"#,
    );

    ctx.apply(&manifest).success();
    let plist = ctx.read_plist("svc.plist");
    assert!(plist.contains("\t<array>\n\t\t<dict/>\n\t\t<dict/>\n\t\t<dict>\n"), "{plist}");

    ctx.apply(&manifest).success().stdout(predicate::str::contains("unchanged"));
    assert_eq!(ctx.plutil().get_log().lines().count(), 1);
}

#[test]
fn mach_services_render_as_nested_dictionary() {
    let ctx = TestContext::new();
    let manifest = ctx.write_manifest(
        "ports.toml",
        r#"
[[job]]
name = "com.example.ports"
program_arguments = ["/usr/local/bin/ports"]

[job.mach_services]
"com.example.port" = { reset_at_close = false, hide_until_check_in = true }
"#,
    );

    ctx.apply(&manifest).success();

    let plist = ctx.read_plist("com.example.ports.plist");
    assert!(plist.contains(
        "\t<key>MachServices</key>\n\t<dict>\n\t\t<key>com.example.port</key>\n\t\t<dict>\n\t\t\t<key>HideUntilCheckIn</key>\n\t\t\t<true/>\n\t\t\t<key>ResetAtClose</key>\n\t\t\t<false/>\n\t\t</dict>\n\t</dict>\n"
    ));
    assert!(plist.contains("\t<key>Label</key>\n\t<string>com.example.ports</string>\n"));
}

#[test]
fn validator_failure_is_reported_and_file_kept() {
    let ctx = TestContext::new();
    let manifest = ctx.write_manifest("svc.toml", SVC);

    ctx.cli()
        .arg("apply")
        .arg(&manifest)
        .arg("--validator")
        .arg(&ctx.rejecting_plutil().program)
        .assert()
        .failure()
        .stderr(predicate::str::contains("plist validation failed"))
        .stderr(predicate::str::contains("Encountered unknown tag frobnicate on line 7"));

    assert!(ctx.agents_dir().join("svc.plist").exists());
}

#[test]
fn skip_validation_writes_without_validator() {
    let ctx = TestContext::new();
    let manifest = ctx.write_manifest("svc.toml", SVC);

    ctx.cli()
        .arg("apply")
        .arg(&manifest)
        .arg("--skip-validation")
        .assert()
        .success()
        .stdout(predicate::str::contains("not validated"));

    assert!(ctx.agents_dir().join("svc.plist").exists());
    assert!(ctx.plutil().get_log().is_empty());
}

#[test]
fn unknown_field_fails_only_that_job() {
    let ctx = TestContext::new();
    let manifest = ctx.write_manifest(
        "mixed.toml",
        r#"
[[job]]
name = "broken"
program_arguments = ["/bin/broken"]
not_a_real_field = true

[[job]]
name = "shape"
program_arguments = ["/bin/shape"]
nice = "high"

[[job]]
name = "good"
program_arguments = ["/bin/good"]
"#,
    );

    ctx.apply(&manifest)
        .failure()
        .stderr(predicate::str::contains("'not_a_real_field' is not a field of job"))
        .stderr(predicate::str::contains("Key: Nice, value: string \"high\". Should be: integer"))
        .stdout(predicate::str::contains("Wrote good"));

    assert!(ctx.agents_dir().join("good.plist").exists());
    assert!(!ctx.agents_dir().join("broken.plist").exists());
    assert!(!ctx.agents_dir().join("shape.plist").exists());
}

#[test]
fn job_without_program_arguments_writes_nothing() {
    let ctx = TestContext::new();
    let manifest =
        ctx.write_manifest("empty.toml", "[[job]]\nname = \"svc\"\nrun_at_load = true\n");

    ctx.apply(&manifest)
        .failure()
        .stderr(predicate::str::contains("no program arguments given"));

    assert!(!ctx.agents_dir().join("svc.plist").exists());
}

#[test]
fn prefix_flag_overrides_manifest() {
    let ctx = TestContext::new();
    let manifest = ctx.write_manifest("svc.toml", SVC);
    let other = ctx.work_dir().join("Other");

    ctx.cli()
        .arg("apply")
        .arg(&manifest)
        .arg("--prefix")
        .arg(&other)
        .arg("--skip-validation")
        .assert()
        .success();

    assert!(other.join("svc.plist").exists());
    assert!(!ctx.agents_dir().join("svc.plist").exists());
}

#[test]
fn missing_manifest_is_an_error() {
    let ctx = TestContext::new();
    ctx.cli()
        .args(["apply", "nope.toml", "--skip-validation"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn verbose_flag_logs_pipeline_to_stderr() {
    let ctx = TestContext::new();
    let manifest = ctx.write_manifest("svc.toml", SVC);

    ctx.cli()
        .arg("-vv")
        .arg("apply")
        .arg(&manifest)
        .arg("--validator")
        .arg(&ctx.plutil().program)
        .assert()
        .success()
        .stderr(predicate::str::contains("creating new plist"))
        .stderr(predicate::str::contains("plist written and validated"));
}
