//! # CLI Module
//!
//! Command-line interface for the photo sifter.
//!
//! ## Usage
//! ```bash
//! # Walk the numbered generations next to folder "5"
//! photo-sift chain ~/photos/5
//!
//! # Compare exactly two folders, consolidating identical copies first
//! photo-sift pair ~/import ~/backup --auto-merge
//!
//! # Non-interactive JSON report
//! photo-sift chain ~/photos/5 --output json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use photo_sifter::core::{
    ApplyResult, CandidateGroup, Classification, Decision, Field, ImageFilter, MergeMode,
    RankingPolicy, Session, Step, Topology, Verdict,
};
use photo_sifter::error::Result;
use std::path::{Path, PathBuf};

/// Photo Sifter - resolve duplicate photos folder by folder
#[derive(Parser, Debug)]
#[command(name = "photo-sift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare numbered generation folders (base N against N-1 .. 1)
    Chain {
        /// Base folder whose name is the newest generation number
        base: PathBuf,

        #[command(flatten)]
        opts: CompareOpts,
    },
    /// Compare exactly two folders
    Pair {
        /// First folder (its listing drives the session)
        first: PathBuf,

        /// Second folder
        second: PathBuf,

        #[command(flatten)]
        opts: CompareOpts,
    },
}

#[derive(Args, Debug)]
struct CompareOpts {
    /// Also accept PNG, GIF and BMP files (default: JPEG only)
    #[arg(long)]
    all_formats: bool,

    /// Classification policy
    #[arg(long, default_value = "preferential")]
    policy: PolicyPreset,

    /// Consolidate identical copies automatically before prompting
    #[arg(long)]
    auto_merge: bool,

    /// What happens to duplicates after a merge
    #[arg(long, default_value = "consolidate")]
    merge_mode: MergeModeOpt,

    /// Consolidation folder (default: "same" next to the base folder)
    #[arg(long)]
    merge_folder: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyPreset {
    /// Oldest date and largest size/resolution/density win
    Preferential,
    /// Only shared values are highlighted
    Commonality,
}

impl From<PolicyPreset> for RankingPolicy {
    fn from(preset: PolicyPreset) -> Self {
        match preset {
            PolicyPreset::Preferential => RankingPolicy::preferential(),
            PolicyPreset::Commonality => RankingPolicy::commonality(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MergeModeOpt {
    /// Move one copy to the consolidation folder, leave the rest
    Consolidate,
    /// Move one copy, trash the rest
    Trash,
}

impl From<MergeModeOpt> for MergeMode {
    fn from(mode: MergeModeOpt) -> Self {
        match mode {
            MergeModeOpt::Consolidate => MergeMode::Consolidate,
            MergeModeOpt::Trash => MergeMode::TrashDuplicates,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Interactive, with colors
    Pretty,
    /// Non-interactive JSON report (no decisions applied)
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let (topology, opts) = match cli.command {
        Commands::Chain { base, opts } => (Topology::Chained { base }, opts),
        Commands::Pair {
            first,
            second,
            opts,
        } => (Topology::Paired { first, second }, opts),
    };

    let filter = if opts.all_formats {
        ImageFilter::extended()
    } else {
        ImageFilter::new()
    };

    let mut builder = Session::builder(topology)
        .filter(filter)
        .policy(opts.policy.into())
        .merge_mode(opts.merge_mode.into());
    if let Some(folder) = opts.merge_folder {
        builder = builder.merge_folder(folder);
    }
    let mut session = builder.build()?;

    match opts.output {
        OutputFormat::Json => report_json(&mut session),
        OutputFormat::Pretty => run_interactive(&mut session, opts.auto_merge),
    }
}

/// Walk the session, prompting for a decision per group
fn run_interactive(session: &mut Session, auto_merge: bool) -> Result<()> {
    let term = Term::stdout();

    term.write_line(&format!(
        "{} {}",
        style("Photo Sifter").bold().cyan(),
        style(format!(
            "{} folders, {} candidates",
            session.folder_set().len(),
            session.filenames().len()
        ))
        .dim()
    ))
    .ok();
    term.write_line("").ok();

    loop {
        let group = match session.next_group() {
            Step::Group(group) => group,
            Step::Terminal => break,
        };

        if auto_merge {
            match session.apply(&group, &Decision::AutoMergeIfIdentical)? {
                ApplyResult::Merged { destination, .. } => {
                    term.write_line(&format!(
                        "{} {} consolidated into {}",
                        style("✓").green().bold(),
                        group.filename,
                        display_path(&destination)
                    ))
                    .ok();
                    continue;
                }
                // Not identical: fall through to the prompt
                _ => {}
            }
        }

        let classification = session.classify(&group);
        render_group(&term, &group, &classification);

        match prompt_decision(&term, &group) {
            Prompt::Quit => return Ok(()),
            Prompt::Decision(decision) => match session.apply(&group, &decision) {
                Ok(ApplyResult::MergeRefused { reason }) => {
                    term.write_line(&format!(
                        "  {} merge refused: {}",
                        style("!").yellow().bold(),
                        reason
                    ))
                    .ok();
                }
                Ok(_) => {}
                Err(e) => {
                    term.write_line(&format!("  {} {}", style("✗").red().bold(), e))
                        .ok();
                }
            },
        }
        term.write_line("").ok();
    }

    term.write_line(&format!(
        "{}",
        style("No more pictures to compare.").bold()
    ))
    .ok();
    Ok(())
}

enum Prompt {
    Decision(Decision),
    Quit,
}

/// Read one decision from the terminal, re-asking on unparseable input
fn prompt_decision(term: &Term, group: &CandidateGroup) -> Prompt {
    loop {
        term.write_line(&format!(
            "Keep which copy? [1-{}], [s]kip, [m]erge identical, [q]uit",
            group.slots.len()
        ))
        .ok();

        let line = match term.read_line() {
            Ok(line) => line,
            // Closed stdin means the user is done
            Err(_) => return Prompt::Quit,
        };

        match line.trim().to_lowercase().as_str() {
            "q" | "quit" => return Prompt::Quit,
            "s" | "skip" => return Prompt::Decision(Decision::Skip),
            "m" | "merge" => return Prompt::Decision(Decision::AutoMergeIfIdentical),
            other => {
                if let Ok(number) = other.parse::<usize>() {
                    if number >= 1 && number <= group.slots.len() {
                        return Prompt::Decision(Decision::KeepOnly(number - 1));
                    }
                }
                term.write_line(&format!("  {}", style("Unrecognized choice").yellow()))
                    .ok();
            }
        }
    }
}

/// Print one candidate group, slot by slot, highlighting shared and best
/// values in green
fn render_group(term: &Term, group: &CandidateGroup, classification: &Classification) {
    term.write_line(&format!(
        "{}",
        style(format!("Comparing: {}", group.filename)).bold().underlined()
    ))
    .ok();

    for (index, slot) in group.slots.iter().enumerate() {
        term.write_line(&format!(
            "  {} {}",
            style(format!("[{}]", index + 1)).bold(),
            display_path(&slot.folder)
        ))
        .ok();

        let Some(meta) = slot.metadata.as_ref() else {
            term.write_line(&format!(
                "      {}",
                style(format!("not found in {}", display_path(&slot.folder))).dim()
            ))
            .ok();
            continue;
        };

        for field in Field::ALL {
            let value = match field {
                Field::Filename => group.filename.clone(),
                Field::Modified => meta.modified_display(),
                Field::SizeBytes => format!("{:.2} MB", meta.megabytes()),
                Field::Dimensions => meta.dimensions_display(),
                Field::PixelCount => format!("{} px", meta.pixel_count()),
                Field::Density => meta.density_display(),
                Field::ColorMode => meta.color_mode_display().to_string(),
                Field::CameraMaker => meta.camera_display().to_string(),
                Field::GeoLocation => meta.geo_display().to_string(),
            };

            let line = format!("{}: {}", field.label(), value);
            let rendered = match classification.verdict(field, index) {
                verdict if verdict.is_affirmative() => style(line).green().to_string(),
                Verdict::Neutral => style(line).dim().to_string(),
                _ => line,
            };
            term.write_line(&format!("      {}", rendered)).ok();
        }
    }
}

/// Walk every group without applying decisions and print a JSON report
fn report_json(session: &mut Session) -> Result<()> {
    let mut groups = Vec::new();

    loop {
        let group = match session.next_group() {
            Step::Group(group) => group,
            Step::Terminal => break,
        };

        let classification = session.classify(&group);
        groups.push(serde_json::json!({
            "filename": group.filename,
            "slots": group.slots,
            "classification": classification,
        }));

        session.apply(&group, &Decision::Skip)?;
    }

    let output = serde_json::json!({
        "folders": session.folder_set().folders(),
        "candidates": session.filenames().len(),
        "groups": groups,
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
    Ok(())
}

/// Shorten paths under the home directory to ~/...
fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
