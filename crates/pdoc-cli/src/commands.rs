use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use pdoc_diff::{ChangeKind, DiffMode, DiffRecord, ResultFilter};
use pdoc_path::{ForcedStep, Leaf, Selector};
use pdoc_sdk::{AppState, Document, StateLedger};
use pdoc_types::{Native, NodeKind, Path, Step};
use serde_json::Value as Json;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli, config: CliConfig) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Get(args) => cmd_get(args, format),
        Command::Find(args) => cmd_find(args, format),
        Command::Set(args) => cmd_set(args),
        Command::Put(args) => cmd_put(args),
        Command::Remove(args) => cmd_remove(args),
        Command::Diff(args) => cmd_diff(args, &config, format),
        Command::Combine(args) => cmd_combine(args),
        Command::Json(args) => cmd_json(args),
        Command::HexToBase64(args) => {
            println!("{}", pdoc_codec::hex_to_base64(&args.hex)?);
            Ok(())
        }
        Command::Base64ToHex(args) => {
            println!("{}", pdoc_codec::base64_to_hex(&args.base64)?);
            Ok(())
        }
        Command::State(args) => cmd_state(args, &config, format),
    }
}

fn parse_steps(raw: &[String]) -> Path {
    raw.iter().map(|s| Step::parse(s)).collect()
}

fn open(file: &std::path::Path) -> anyhow::Result<Document> {
    Document::open(file).with_context(|| format!("opening {}", file.display()))
}

fn print_json(json: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(json)?);
    Ok(())
}

/// JSON for `--shallow`: containers converted, scalars as rendered text.
fn shallow_json(native: Native<'_>) -> Json {
    match native {
        Native::Map(map) => Json::Object(map.into_iter().map(|(k, v)| (k, shallow_json(v))).collect()),
        Native::List(items) => Json::Array(items.into_iter().map(shallow_json).collect()),
        Native::Handle(value) => Json::String(value.render()),
        Native::Scalar(json) => json,
    }
}

fn cmd_get(args: GetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let doc = open(&args.file)?;
    let path = parse_steps(&args.steps);
    let value = doc
        .get(&path)
        .ok_or_else(|| anyhow!("no value at {path}"))?;
    match (format, value.text()) {
        (OutputFormat::Text, Some(text)) => println!("{text}"),
        _ => print_json(&value.to_json())?,
    }
    Ok(())
}

fn cmd_find(args: FindArgs, format: OutputFormat) -> anyhow::Result<()> {
    let doc = open(&args.file)?;
    let selectors = args
        .selectors
        .iter()
        .map(|s| Selector::parse(s))
        .collect::<Result<Vec<_>, _>>()?;
    let paths = doc.find_paths(&selectors);
    match format {
        OutputFormat::Json => print_json(&paths)?,
        OutputFormat::Text if paths.is_empty() => println!("No matches."),
        OutputFormat::Text => {
            for path in &paths {
                println!("{path}");
            }
        }
    }
    Ok(())
}

fn cmd_set(args: SetArgs) -> anyhow::Result<()> {
    let mut doc = open(&args.file)?;
    let steps = args
        .steps
        .iter()
        .map(|s| s.parse::<ForcedStep>())
        .collect::<Result<Vec<_>, _>>()?;
    let leaf = Leaf::new(args.kind.parse::<NodeKind>()?, args.value);
    doc.set_forced(&steps, &leaf)?;
    doc.save()?;
    let shown: Vec<String> = steps.iter().map(ToString::to_string).collect();
    println!("{} Set {} = {}", "✓".green().bold(), shown.join(" ").cyan(), leaf.raw.yellow());
    Ok(())
}

fn cmd_put(args: PutArgs) -> anyhow::Result<()> {
    let mut doc = open(&args.file)?;
    let path = parse_steps(&args.steps);
    let (parent, slot) = path
        .split_last()
        .ok_or_else(|| anyhow!("put needs at least one step"))?;
    let value = args.kind.parse::<NodeKind>()?.build(&args.value)?;
    doc.set(&parent, slot.clone(), value)?;
    doc.save()?;
    println!("{} Put {}", "✓".green().bold(), path.to_string().cyan());
    Ok(())
}

fn cmd_remove(args: RemoveArgs) -> anyhow::Result<()> {
    let mut doc = open(&args.file)?;
    let path = parse_steps(&args.steps);
    let (parent, slot) = path
        .split_last()
        .ok_or_else(|| anyhow!("remove needs at least one step"))?;
    if !doc.remove(&parent, slot.clone()) {
        bail!("nothing removed at {path}");
    }
    doc.save()?;
    println!("{} Removed {}", "✓".green().bold(), path.to_string().cyan());
    Ok(())
}

fn marker(kind: ChangeKind) -> colored::ColoredString {
    match kind {
        ChangeKind::MissingFromSecond => "-".red().bold(),
        ChangeKind::MissingFromFirst => "+".green().bold(),
        ChangeKind::Differs => "~".yellow().bold(),
        ChangeKind::Equal => "=".dimmed(),
        ChangeKind::DepthTruncated => "…".cyan(),
    }
}

fn print_record(record: &DiffRecord) {
    println!("{} {}", marker(record.kind), record);
}

fn cmd_diff(args: DiffArgs, config: &CliConfig, format: OutputFormat) -> anyhow::Result<()> {
    let first = open(&args.first)?;
    let second = open(&args.second)?;

    let mut options = config.diff.clone();
    options.mode = DiffMode::Collect;
    if let Some(depth) = args.max_depth {
        options.max_depth = depth;
    }
    if !args.only.is_empty() {
        let kinds = args
            .only
            .iter()
            .map(|s| s.parse::<ChangeKind>().map_err(|e| anyhow!(e)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        options.filter = ResultFilter::only(kinds);
    }

    let records = first.diff(&second, &options)?;
    match format {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Text if records.is_empty() => println!("No differences."),
        OutputFormat::Text => records.iter().for_each(print_record),
    }
    Ok(())
}

fn cmd_combine(args: CombineArgs) -> anyhow::Result<()> {
    let mut first = open(&args.first)?;
    let second = open(&args.second)?;
    first.combine(&second)?;
    match args.output {
        Some(out) => first.save_as(out)?,
        None => first.save()?,
    }
    let target = first.source().map(|p| p.display().to_string()).unwrap_or_default();
    println!("{} Merged {} into {}", "✓".green().bold(), args.second.display(), target.bold());
    Ok(())
}

fn cmd_json(args: JsonArgs) -> anyhow::Result<()> {
    let doc = open(&args.file)?;
    let json = if args.shallow {
        shallow_json(doc.to_native(false))
    } else {
        doc.to_native(true).into_json()
    };
    print_json(&json)
}

fn print_state(state: &AppState) {
    let version = state.version.as_deref().unwrap_or("?");
    println!("{}  {}", state.name.bold(), version.yellow());
    if let Some(url) = &state.url {
        println!("  URL: {}", url.blue());
    }
    if let Some(checked) = &state.checked {
        println!("  Checked: {}", pdoc_types::format_date(checked));
    }
    if !state.history.is_empty() {
        println!("  History: {}", state.history.join(", ").dimmed());
    }
}

fn cmd_state(args: StateArgs, config: &CliConfig, format: OutputFormat) -> anyhow::Result<()> {
    let file = args.file.unwrap_or_else(|| config.state_path.clone());
    let mut ledger = StateLedger::open(&file)
        .with_context(|| format!("opening state {}", file.display()))?;

    match args.action {
        StateAction::Record { app, version, url } => {
            let changed = ledger.record_now(&app, &version, url.as_deref())?;
            ledger.save()?;
            if changed {
                println!("{} {} is now {}", "✓".green().bold(), app.bold(), version.yellow());
            } else {
                println!("{} {} unchanged", app.bold(), version.dimmed());
            }
        }
        StateAction::Show { app: Some(app) } => {
            let state = ledger
                .app(&app)
                .ok_or_else(|| anyhow!("{app} is not tracked"))?;
            match format {
                OutputFormat::Json => print_json(&state)?,
                OutputFormat::Text => print_state(&state),
            }
        }
        StateAction::Show { app: None } => {
            let states = ledger.states();
            match format {
                OutputFormat::Json => print_json(&states)?,
                OutputFormat::Text if states.is_empty() => println!("No applications tracked."),
                OutputFormat::Text => states.iter().for_each(print_state),
            }
        }
        StateAction::Forget { app } => {
            if !ledger.forget(&app) {
                bail!("{app} is not tracked");
            }
            ledger.save()?;
            println!("Forgot {}", app.bold());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdoc_types::{path, Value};

    #[test]
    fn steps_parse_keys_and_indices() {
        let raw: Vec<String> = ["apps", "[2]", "name"].iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_steps(&raw), path!["apps", 2usize, "name"]);
    }

    #[test]
    fn shallow_json_renders_scalars() {
        let doc: Value = [
            ("n", Value::Integer(3)),
            ("list", Value::Array(vec![Value::Bool(true)])),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            shallow_json(doc.to_native(false)),
            serde_json::json!({"n": "3", "list": ["true"]})
        );
    }

    #[test]
    fn set_put_remove_against_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.plist");
        pdoc_codec::save(&Value::dict(), &file).unwrap();

        cmd_set(SetArgs {
            file: file.clone(),
            steps: vec!["dict:tags".into(), "array:add".into()],
            kind: "string".into(),
            value: "first".into(),
        })
        .unwrap();
        cmd_put(PutArgs {
            file: file.clone(),
            steps: vec!["count".into()],
            kind: "int".into(),
            value: "2".into(),
        })
        .unwrap();

        let doc = Document::open(&file).unwrap();
        assert_eq!(doc.get(&path!["count"]), Some(&Value::Integer(2)));
        assert_eq!(doc.get_string(&path!["tags", 0usize]), Some("first".into()));

        cmd_remove(RemoveArgs {
            file: file.clone(),
            steps: vec!["tags".into(), "[0]".into()],
        })
        .unwrap();
        assert!(cmd_remove(RemoveArgs {
            file: file.clone(),
            steps: vec!["tags".into(), "[0]".into()],
        })
        .is_err());
        let doc = Document::open(&file).unwrap();
        assert_eq!(doc.get(&path!["tags"]), Some(&Value::array()));
    }
}
