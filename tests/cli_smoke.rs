mod support;

use predicates::str::contains;

#[test]
fn toolbelt_help_works() {
    support::toolbelt_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("everyday utilities"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        vec!["calc"],
        vec!["calc", "eval"],
        vec!["calc", "keys"],
        vec!["rps"],
        vec!["rps", "play"],
        vec!["contacts"],
        vec!["contacts", "update"],
        vec!["pass"],
        vec!["pass", "gen"],
        vec!["todo"],
        vec!["todo", "add"],
    ];

    for args in subcommands {
        support::toolbelt_cmd()
            .args(&args)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn unknown_subcommand_is_usage_error() {
    support::toolbelt_cmd()
        .arg("frobnicate")
        .assert()
        .code(2);
}

#[test]
fn verbose_logs_go_to_stderr() -> Result<(), Box<dyn std::error::Error>> {
    let data = support::TestData::init()?;

    data.cmd()
        .args(["-v", "todo", "list", "--json"])
        .assert()
        .success()
        .stdout(contains("\"schema_version\": \"toolbelt.v1\""))
        .stderr(contains("resolved data directory"));

    Ok(())
}
