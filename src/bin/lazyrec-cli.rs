//! CLI для работы с сохранёнными записями.
//!
//! Читает и пишет записи в persist-конверте, показывает их содержимое в
//! JSON и сравнивает две записи по логическому содержимому.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lazyrec::{
    init_logging, read_record, write_record, AnyRecord, FieldMap, LazyRecord, RecordFacade,
    RecordKind, Settings, SharedCodec, Value,
};
use serde_json::json;
use tracing::debug;

/// Основная структура CLI аргументов
#[derive(Parser)]
#[command(name = "lazyrec-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect, build and compare persisted lazy records", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Файл настроек (по умолчанию ищется lazyrec.toml в текущем каталоге)
    #[arg(short, long, env = "LAZYREC_CONFIG", global = true)]
    config: Option<PathBuf>,
    /// Включить подробный вывод (debug)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Подавить логирование полностью
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Компактный JSON вместо многострочного
    #[arg(long, global = true)]
    compact: bool,
    /// Подкоманда для выполнения
    #[command(subcommand)]
    command: Commands,
}

/// Подкоманды CLI
#[derive(Subcommand)]
enum Commands {
    /// Показать содержимое сохранённой записи в JSON
    #[command(alias = "show")]
    Inspect {
        /// Файл с записью
        file: PathBuf,
        /// Вид фасада (переопределяет record.kind из настроек)
        #[arg(long)]
        kind: Option<String>,
    },
    /// Собрать запись из JSON-объекта и сохранить её
    Encode {
        /// JSON-файл с объектом полей ("-" для stdin)
        input: String,
        /// Куда записать запись
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Сравнить две записи по содержимому
    Diff { left: PathBuf, right: PathBuf },
    /// Версия, коммит и время сборки
    Version,
}

/// Точка входа в CLI
fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    if let Commands::Version = cli.command {
        print_version();
        return Ok(0);
    }

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if cli.quiet {
        settings.logging.console.enabled = false;
        settings.logging.file.enabled = false;
    } else if cli.verbose {
        settings.logging.level = "debug".to_string();
    } else {
        settings.logging.level = "warn".to_string();
    }
    let logging = init_logging(settings.logging.clone()).context("initializing logging")?;

    let codec = settings.codec()?;
    debug!(config = ?cli.config, "Settings loaded");

    let code = match &cli.command {
        Commands::Inspect { file, kind } => {
            let kind = match kind {
                Some(name) => name.parse::<RecordKind>()?,
                None => settings.record_kind()?,
            };
            let report = inspect(file, &codec, kind)?;
            print_json(&report, cli.compact)?;
            0
        }
        Commands::Encode { input, output } => {
            encode(input, output, &codec)?;
            0
        }
        Commands::Diff { left, right } => {
            let (equal, report) = diff(left, right, &codec)?;
            print_json(&report, cli.compact)?;
            if equal {
                0
            } else {
                1
            }
        }
        Commands::Version => {
            print_version();
            0
        }
    };

    logging.shutdown();
    Ok(code)
}

fn load(
    path: &Path,
    codec: &SharedCodec,
) -> Result<LazyRecord> {
    let mut file =
        fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let record = read_record(&mut file, codec.clone())
        .with_context(|| format!("reading record from {}", path.display()))?;
    Ok(record)
}

/// Отчёт о записи: вид фасада, размер полезной нагрузки и поля.
fn inspect(
    path: &Path,
    codec: &SharedCodec,
    kind: RecordKind,
) -> Result<serde_json::Value> {
    let record = load(path, codec)?;
    let payload_bytes = record.raw_bytes().map_or(0, |b| b.len());

    let mut facade = kind.wrap(record);
    facade
        .record_mut()
        .try_materialize()
        .with_context(|| format!("decoding record from {}", path.display()))?;

    let names: Vec<String> = facade.iter().map(|(name, _)| name.to_string()).collect();
    let mut fields = serde_json::Map::with_capacity(names.len());
    for name in names {
        let entry = match &mut facade {
            AnyRecord::Typed(typed) => match typed.get(&name) {
                Some(tv) => json!({ "tag": tv.tag.to_string(), "value": tv.value.to_json() }),
                None => continue,
            },
            AnyRecord::Untyped(untyped) => match untyped.get(&name) {
                Some(value) => value.to_json(),
                None => continue,
            },
        };
        fields.insert(name, entry);
    }

    Ok(json!({
        "kind": kind.name(),
        "payload_bytes": payload_bytes,
        "field_count": facade.field_count()?,
        "fields": fields,
    }))
}

/// Собирает запись из JSON-объекта и пишет её в конверте.
fn encode(
    input: &str,
    output: &Path,
    codec: &SharedCodec,
) -> Result<()> {
    let text = if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        buf
    } else {
        fs::read_to_string(input).with_context(|| format!("reading {input}"))?
    };

    let json: serde_json::Value = serde_json::from_str(&text).context("parsing JSON input")?;
    let Value::Map(fields) = Value::from_json(&json) else {
        bail!("expected a JSON object at the top level");
    };

    let mut record = LazyRecord::empty(codec.clone());
    for (name, value) in fields {
        record.set(name, value)?;
    }

    let mut file =
        fs::File::create(output).with_context(|| format!("creating {}", output.display()))?;
    write_record(&mut file, &record)?;
    debug!(output = %output.display(), fields = record.field_count()?, "Record written");
    Ok(())
}

/// Сравнивает две записи и перечисляет различающиеся поля.
fn diff(
    left: &Path,
    right: &Path,
    codec: &SharedCodec,
) -> Result<(bool, serde_json::Value)> {
    let mut a = load(left, codec)?;
    let mut b = load(right, codec)?;

    if a == b {
        return Ok((true, json!({ "equal": true })));
    }

    let a_fields: FieldMap = a.iter().map(|(k, v)| (k, v.clone())).collect();
    let b_fields: FieldMap = b.iter().map(|(k, v)| (k, v.clone())).collect();

    let mut changes = Vec::new();
    for (name, value) in &a_fields {
        match b_fields.get(name) {
            None => changes.push(json!({ "field": name, "left": value.to_json() })),
            Some(other) if other != value => changes.push(json!({
                "field": name,
                "left": value.to_json(),
                "right": other.to_json(),
            })),
            Some(_) => {}
        }
    }
    for (name, value) in &b_fields {
        if !a_fields.contains_key(name) {
            changes.push(json!({ "field": name, "right": value.to_json() }));
        }
    }

    Ok((
        false,
        json!({
            "equal": false,
            "left_readable": a.materialize(),
            "right_readable": b.materialize(),
            "changes": changes,
        }),
    ))
}

fn print_json(
    value: &serde_json::Value,
    compact: bool,
) -> Result<()> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{text}");
    Ok(())
}

fn print_version() {
    println!("lazyrec-cli {}", env!("CARGO_PKG_VERSION"));
    println!("commit:     {}", env!("LAZYREC_GIT_COMMIT"));
    println!("built:      {}", env!("LAZYREC_BUILD_TIME"));
}
