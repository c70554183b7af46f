use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use zettel_tags_config::{Config, Exclusions};
use zettel_tags_engine::options::Options;
use zettel_tags_engine::tags::{Renderer, TagTable};
use zettel_tags_engine::{NoteFile, NoteFormat, NoteScanner, io as notes_io};

/// Writes a tags file for Zettelkasten notes.
#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "zettel-tags", version)]
struct Args {
    /// Print a cross-reference listing instead of a tags file
    #[arg(short = 'x', long)]
    xref: bool,

    /// Write to FILE ('-' for stdout; default 'tags', or stdout with -x)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Cross-reference line format
    #[arg(long, value_name = "FMT")]
    format: Option<String>,

    /// Emit forward-link (Folgezettel) tags
    #[arg(long)]
    folgezettel: bool,

    /// Log progress and diagnostics
    #[arg(short, long)]
    verbose: bool,

    /// Read configuration from FILE
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Notes or directories scanned recursively; defaults to the configured
    /// notes_path
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

/// One file to scan, with the name it gets in the output.
#[derive(Debug)]
struct Input {
    name: String,
    format: NoteFormat,
    text: String,
}

/// Reads every note under `path`, skipping excluded files.
fn collect_inputs(path: &Path, exclusions: &Exclusions, inputs: &mut Vec<Input>) -> Result<()> {
    if path.is_dir() {
        for note in notes_io::scan_note_files(path)? {
            if exclusions.is_excluded(note.relative_path().as_str()) {
                log::debug!("excluded {}", note.relative_path());
                continue;
            }
            let text = notes_io::read_note(note.relative_path(), path)?;
            inputs.push(Input {
                name: display_name(path, &note),
                format: note.format(),
                text,
            });
        }
        return Ok(());
    }

    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(NoteFormat::from_extension);
    let Some(format) = format else {
        log::warn!("skipping {}: not a note file", path.display());
        return Ok(());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    inputs.push(Input {
        name: path.to_string_lossy().into_owned(),
        format,
        text,
    });
    Ok(())
}

fn display_name(root: &Path, note: &NoteFile) -> String {
    if root == Path::new(".") {
        return note.relative_path().to_string();
    }
    note.relative_path().to_path(root).to_string_lossy().into_owned()
}

/// Scans every input into one tag table and renders it to `out`.
fn generate(options: &Options, inputs: &[Input], xref: bool, out: &mut impl Write) -> Result<()> {
    let scanner = NoteScanner::new(options)?;
    let mut table = TagTable::new(options);

    for input in inputs {
        let source = table.add_source(input.name.as_str(), input.text.as_str());
        let scan = match input.format {
            NoteFormat::Markdown => scanner.scan_note(&input.text, source, &mut table),
            NoteFormat::Yaml => scanner.scan_metadata(&input.text, source, &mut table),
        };
        if !scan.end.is_complete() {
            log::warn!("{}: scan stopped early ({:?})", input.name, scan.end);
        }
        log::info!(
            "{}: {} references, {} metadata blocks",
            input.name,
            scan.references,
            scan.metadata_blocks
        );
    }

    let renderer = Renderer::new(&table)?;
    if xref {
        renderer.write_xref(out)?;
    } else {
        renderer.write_tags(out)?;
    }
    log::info!("{} tags from {} files", table.len(), inputs.len());
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from_path(&config_path)? {
        Some(config) => {
            log::info!("Loaded config from {}", config_path.display());
            config
        }
        None if args.config.is_some() => {
            bail!("config file {} not found", config_path.display())
        }
        None => Config::default(),
    };
    let exclusions = config.exclusions()?;

    let mut options = config.tags.clone();
    if let Some(format) = args.format {
        options.xref_format = Some(format);
    }
    if args.folgezettel {
        options.folgezettel = true;
    }

    let paths = if args.paths.is_empty() {
        let Some(notes_path) = config.notes_path.clone() else {
            bail!(
                "no PATH given and no notes_path in {}",
                config_path.display()
            );
        };
        notes_io::validate_notes_dir(&notes_path)
            .with_context(|| format!("notes_path from config file '{}'", config_path.display()))?;
        vec![notes_path]
    } else {
        args.paths
    };

    let mut inputs = Vec::new();
    for path in &paths {
        collect_inputs(path, &exclusions, &mut inputs)?;
    }

    let output = match args.output {
        Some(path) if path.as_os_str() == "-" => None,
        Some(path) => Some(path),
        None if args.xref => None,
        None => Some(PathBuf::from("tags")),
    };
    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            generate(&options, &inputs, args.xref, &mut out)?;
            out.flush()?;
        }
        None => {
            let mut out = io::stdout().lock();
            generate(&options, &inputs, args.xref, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("zettel-tags").chain(list.iter().copied()))
    }

    fn write(dir: &TempDir, relative: &str, content: &str) {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_parse_flags_and_paths() {
        let parsed = args(&["-x", "--format", "%N %n", "--folgezettel", "-v", "notes", "z1.md"]).unwrap();
        assert_eq!(
            parsed,
            Args {
                xref: true,
                format: Some("%N %n".into()),
                folgezettel: true,
                verbose: true,
                paths: vec![PathBuf::from("notes"), PathBuf::from("z1.md")],
                ..Args::default()
            }
        );
    }

    #[test]
    fn test_parse_output_and_config() {
        let parsed = args(&["-o", "TAGS", "--config", "cfg.toml", "--", "-odd.md"]).unwrap();
        assert_eq!(parsed.output, Some(PathBuf::from("TAGS")));
        assert_eq!(parsed.config, Some(PathBuf::from("cfg.toml")));
        assert_eq!(parsed.paths, vec![PathBuf::from("-odd.md")]);
    }

    #[test]
    fn test_command_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_errors() {
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["-o"]).is_err());
        assert!(args(&["--format"]).is_err());
    }

    #[test]
    fn test_collect_skips_excluded_and_foreign_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "z1.md", "[[z2]]\n");
        write(&dir, "refs.yml", "id: bib\n");
        write(&dir, "archive/old.md", "[[z0]]\n");
        write(&dir, "image.png", "png");
        let config = Config {
            exclude: vec!["archive/**".into()],
            ..Config::default()
        };

        let mut inputs = Vec::new();
        collect_inputs(dir.path(), &config.exclusions().unwrap(), &mut inputs).unwrap();

        let root = dir.path().to_string_lossy().into_owned();
        let found: Vec<_> = inputs.iter().map(|i| (i.name.clone(), i.format)).collect();
        assert_eq!(
            found,
            vec![
                (format!("{root}/refs.yml"), NoteFormat::Yaml),
                (format!("{root}/z1.md"), NoteFormat::Markdown),
            ]
        );
    }

    #[test]
    fn test_collect_single_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "z1.markdown", "[[z2]]\n");
        write(&dir, "notes.txt", "[[z3]]\n");

        let mut inputs = Vec::new();
        let exclusions = Exclusions::default();
        collect_inputs(&dir.path().join("z1.markdown"), &exclusions, &mut inputs).unwrap();
        collect_inputs(&dir.path().join("notes.txt"), &exclusions, &mut inputs).unwrap();

        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].format, NoteFormat::Markdown);
        assert_eq!(inputs[0].text, "[[z2]]\n");
    }

    #[test]
    fn test_generate_xref_listing() {
        let options = Options {
            xref_format: Some("%R %k %N %F:%n %{summaryLine}".into()),
            ..Options::default()
        };
        let inputs = vec![
            Input {
                name: "z1.md".into(),
                format: NoteFormat::Markdown,
                text: "---\nid: z1\ntitle: Hello\n---\nSee [[z2]].\n".into(),
            },
            Input {
                name: "refs.yaml".into(),
                format: NoteFormat::Yaml,
                text: "references:\n- id: doe99\n  title: A Book\n".into(),
            },
        ];

        let mut out = Vec::new();
        generate(&options, &inputs, true, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "D i z1 z1.md:2 z1:Hello\n\
             D t Hello z1.md:3 z1:Hello\n\
             R w z2 z1.md:5 See [[z2]].\n\
             D c @doe99 refs.yaml:2 doe99:A Book\n\
             D r A Book refs.yaml:3 doe99:A Book\n"
        );
    }

    #[test]
    fn test_generate_tags_file() {
        let options = Options::default();
        let inputs = vec![Input {
            name: "z1.md".into(),
            format: NoteFormat::Markdown,
            text: "---\nid: z1\n---\n[[z2]]\n".into(),
        }];

        let mut out = Vec::new();
        generate(&options, &inputs, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("!_TAG_FILE_FORMAT\t2\t"));
        let tags: Vec<_> = text.lines().filter(|l| !l.starts_with("!_")).collect();
        assert_eq!(
            tags,
            vec![
                "z1\tz1.md\t2;\"\ti\tsummary:z1:",
                "z2\tz1.md\t4;\"\tw\troles:reference\tsummary:[[z2]]",
            ]
        );
    }

    #[test]
    fn test_run_writes_tags_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes/z1.md", "---\nid: z1\n---\n[[z2]]\n");
        let config_path = dir.path().join("config.toml");
        let notes = dir.path().join("notes");
        fs::write(
            &config_path,
            format!("notes_path = \"{}\"\n\n[tags]\nfolgezettel = true\n", notes.display()),
        )
        .unwrap();
        let output = dir.path().join("tags");

        run(Args {
            config: Some(config_path),
            output: Some(output.clone()),
            ..Args::default()
        })
        .unwrap();

        let text = fs::read_to_string(output).unwrap();
        assert!(text.contains("z2\t"), "{text}");
    }

    #[test]
    fn test_run_requires_existing_config_when_given() {
        let dir = TempDir::new().unwrap();
        let result = run(Args {
            config: Some(dir.path().join("missing.toml")),
            paths: vec![dir.path().to_path_buf()],
            ..Args::default()
        });
        assert!(result.is_err());
    }
}
