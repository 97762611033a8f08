// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Wraps the cargo invocations CI runs, plus two project tasks:
//!
//! - `cargo xtask verify-migrations` applies the `SQLite` migrations to a
//!   scratch database and checks the resulting tables against
//!   `crates/persistence/src/diesel_schema.rs`, then reverts them and checks
//!   nothing is left behind.
//! - `cargo xtask serve` runs the server against a development database.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use duct::cmd;
use std::collections::BTreeMap;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

const DIESEL_SCHEMA: &str = "crates/persistence/src/diesel_schema.rs";

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, migrations)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Generate code coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Check dependencies
    #[command(visible_alias = "cd")]
    Deny,

    /// Check unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Lint markdown files
    #[command(visible_alias = "md")]
    LintMarkdown,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix typos in the project
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run the server against a development database
    #[command(visible_alias = "s")]
    Serve {
        /// Database file, relative to the workspace root
        #[arg(long, default_value = "target/roleta-dev.sqlite")]
        database: String,

        /// Optional schedule file
        #[arg(long)]
        schedule: Option<String>,
    },

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Check the migrations against the Diesel schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Deny => deny(),
            Self::Machete => machete(),
            Self::Coverage => coverage(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::LintMarkdown => lint_markdown(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::FixTypos => fix_typos(),
            Self::Serve { database, schedule } => serve(&database, schedule.as_deref()),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test, migrations)
fn ci() -> Result<()> {
    lint()?;
    deny()?;
    machete()?;
    build()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

fn deny() -> Result<()> {
    run_cargo(vec!["deny", "check"])
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Generate code coverage report
fn coverage() -> Result<()> {
    run_cargo(vec![
        "llvm-cov",
        "--lcov",
        "--output-path",
        "target/lcov.info",
        "--all-features",
    ])
}

/// Lint formatting, typos, clippy, and docs (and a soft fail on markdown)
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    if let Err(err) = lint_markdown() {
        tracing::warn!("markdownlint reported issues: {err}");
    }
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Lint markdown files using [markdownlint-cli2](https://github.com/DavidAnson/markdownlint-cli2)
fn lint_markdown() -> Result<()> {
    cmd!("markdownlint-cli2", "**/*.md", "!target", "!**/target", "!examples").run_with_trace()?;
    Ok(())
}

/// Check for typos in the project using [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

/// Fix typos in the project
fn fix_typos() -> Result<()> {
    cmd!("typos", "-w").run_with_trace()?;
    Ok(())
}

/// Run the server with debug logging against a file database
fn serve(database: &str, schedule: Option<&str>) -> Result<()> {
    let mut args: Vec<&str> = vec!["run", "--package", "roleta-server", "--", "--database", database];
    if let Some(schedule) = schedule {
        args.push("--schedule");
        args.push(schedule);
    }
    cmd("cargo", args)
        .env("RUST_LOG", "roleta=debug,roleta_api=debug,roleta_server=debug,info")
        .run_with_trace()?;
    Ok(())
}

/// Run tests for libs and docs
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

/// Run doc tests for the workspace's default packages
fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run lib tests for the workspace's default packages
fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Column as seen by the check: normalized type and nullability.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Column {
    normalized_type: String,
    nullable: bool,
}

type Schema = BTreeMap<String, BTreeMap<String, Column>>;

/// Applies the migrations to a scratch database and compares the result with
/// the Diesel schema, then reverts them.
///
/// # Errors
///
/// Fails if a migration does not apply or revert cleanly, or a table or
/// column differs from `diesel_schema.rs`.
fn verify_migrations() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;
    let schema_path = meta.workspace_root.join(DIESEL_SCHEMA);
    let declared: Schema = parse_diesel_schema(
        &std::fs::read_to_string(&schema_path)
            .wrap_err(format!("failed to read {schema_path}"))?,
    );
    tracing::info!(tables = declared.len(), "Parsed {}", DIESEL_SCHEMA);

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply migrations: {e}"))?;
    tracing::info!("Migrations applied");

    let applied: Schema = introspect_sqlite_schema(&mut conn)?;
    compare_schemas(&declared, &applied)?;
    tracing::info!("Migrated schema matches {}", DIESEL_SCHEMA);

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert migrations: {e}"))?;
    let leftover: Schema = introspect_sqlite_schema(&mut conn)?;
    if !leftover.is_empty() {
        return Err(eyre!(
            "Tables left after reverting migrations: {:?}",
            leftover.keys().collect::<Vec<_>>()
        ));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// Reads table and column declarations out of `diesel::table!` blocks.
fn parse_diesel_schema(source: &str) -> Schema {
    let mut schema: Schema = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in source.lines().map(str::trim) {
        if line.ends_with(") {") && !line.starts_with("diesel::") {
            current = line.split_whitespace().next().map(str::to_string);
            if let Some(table) = &current {
                schema.entry(table.clone()).or_default();
            }
        } else if line == "}" {
            current = None;
        } else if let (Some(table), Some((name, ty))) = (&current, line.split_once("->")) {
            let ty: &str = ty.trim().trim_end_matches(',');
            let (inner, nullable) = ty
                .strip_prefix("Nullable<")
                .and_then(|t| t.strip_suffix('>'))
                .map_or((ty, false), |t| (t, true));
            if let Some(columns) = schema.get_mut(table) {
                columns.insert(
                    name.trim().to_string(),
                    Column {
                        normalized_type: normalize_diesel_type(inner),
                        nullable,
                    },
                );
            }
        }
    }

    schema
}

fn normalize_diesel_type(diesel_type: &str) -> String {
    match diesel_type {
        "BigInt" | "Integer" | "SmallInt" | "Bool" => String::from("integer"),
        "Text" | "Timestamp" | "Date" => String::from("text"),
        "Double" | "Float" => String::from("real"),
        "Binary" => String::from("blob"),
        other => other.to_lowercase(),
    }
}

fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let upper = sqlite_type.to_uppercase();
    if upper.contains("INT") || upper.contains("BOOL") {
        String::from("integer")
    } else if upper.contains("CHAR") || upper.contains("TEXT") || upper.contains("CLOB") {
        String::from("text")
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        String::from("real")
    } else if upper.contains("BLOB") || upper.is_empty() {
        String::from("blob")
    } else {
        sqlite_type.to_lowercase()
    }
}

fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
    }

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    let mut schema: Schema = BTreeMap::new();
    for table in tables {
        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        let columns: BTreeMap<String, Column> = columns
            .into_iter()
            .map(|col| {
                (
                    col.name,
                    Column {
                        normalized_type: normalize_sqlite_type(&col.r#type),
                        nullable: col.notnull == 0,
                    },
                )
            })
            .collect();
        schema.insert(table.name, columns);
    }

    Ok(schema)
}

fn compare_schemas(declared: &Schema, applied: &Schema) -> Result<()> {
    let mut differences: Vec<String> = Vec::new();

    for table in declared.keys().filter(|t| !applied.contains_key(*t)) {
        differences.push(format!("table '{table}' is declared but not created"));
    }
    for table in applied.keys().filter(|t| !declared.contains_key(*t)) {
        differences.push(format!("table '{table}' is created but not declared"));
    }

    for (table, declared_columns) in declared {
        let Some(applied_columns) = applied.get(table) else {
            continue;
        };
        for (name, column) in declared_columns {
            match applied_columns.get(name) {
                None => differences.push(format!("{table}.{name} is declared but not created")),
                Some(found) if found != column => differences.push(format!(
                    "{table}.{name}: declared {column:?}, created {found:?}"
                )),
                Some(_) => {}
            }
        }
        for name in applied_columns.keys().filter(|n| !declared_columns.contains_key(*n)) {
            differences.push(format!("{table}.{name} is created but not declared"));
        }
    }

    if differences.is_empty() {
        return Ok(());
    }
    for difference in &differences {
        tracing::error!("{difference}");
    }
    Err(eyre!("{} schema difference(s) found", differences.len()))
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
