mod render;
mod session;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use clap::{Parser, Subcommand};
use promptsmith_contracts::collections::{FewShotLibrary, Gallery, GeneratedImageData, TaskList};
use promptsmith_contracts::models::{AspectRatio, TargetModel};
use promptsmith_contracts::store::{FileStore, LocalStore};
use promptsmith_contracts::templates::TemplateCatalog;
use promptsmith_contracts::theme::{Theme, ThemePreference};
use promptsmith_engine::{GeminiClient, Workbench};

const STORE_FILE_NAME: &str = "storage.json";
const DATA_DIR_ENV: &str = "PROMPTSMITH_DATA_DIR";

#[derive(Debug, Parser)]
#[command(
    name = "promptsmith",
    version,
    about = "Rewrite prompts for specific AI models with Gemini"
)]
struct Cli {
    /// Directory holding storage.json (defaults to the platform data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Optimize a prompt for one or more target models.
    Optimize(OptimizeArgs),
    #[command(subcommand)]
    Image(ImageCommand),
    #[command(subcommand)]
    Tasks(TaskCommand),
    #[command(subcommand)]
    Examples(ExampleCommand),
    #[command(subcommand)]
    Gallery(GalleryCommand),
    #[command(subcommand)]
    Theme(ThemeCommand),
    #[command(subcommand)]
    Templates(TemplateCommand),
    /// Interactive session driven by slash commands.
    Session,
}

#[derive(Debug, Parser)]
struct OptimizeArgs {
    /// Target model; repeat to select several.
    #[arg(long = "model", short = 'm')]
    models: Vec<TargetModel>,
    #[arg(long, conflicts_with = "template")]
    prompt: Option<String>,
    /// Start from a built-in template (slug, number or title).
    #[arg(long)]
    template: Option<String>,
    /// Also print a word diff between the original and optimized prompt.
    #[arg(long)]
    diff: bool,
    /// Generate an image from the optimized prompt at this aspect ratio.
    #[arg(long, value_name = "RATIO")]
    generate_image: Option<AspectRatio>,
}

#[derive(Debug, Subcommand)]
enum ImageCommand {
    /// Generate an image and add it to the gallery.
    Generate {
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = "1:1")]
        aspect_ratio: AspectRatio,
        /// Also write the image to this path.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Ask a question about a local image.
    Analyze {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        question: String,
    },
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    List,
    Add { text: String },
    /// Toggle completion.
    Done { id: String },
    Edit { id: String, text: String },
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum ExampleCommand {
    List,
    Add {
        #[arg(long)]
        input: Option<String>,
        #[arg(long)]
        output: Option<String>,
    },
    Set {
        id: String,
        input: String,
        output: String,
    },
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum GalleryCommand {
    List,
    Rename { id: String, prompt: String },
    /// Decode an image and write it to disk.
    Export { id: String, path: PathBuf },
    Delete { id: String },
    /// Remove every image.
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum ThemeCommand {
    Show,
    Set { theme: Theme },
}

#[derive(Debug, Subcommand)]
enum TemplateCommand {
    List,
    Show { name: String },
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(err) => {
            eprintln!("promptsmith error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let store = open_store(&data_dir)?;
    match cli.command {
        Command::Optimize(args) => run_optimize(&store, args),
        Command::Image(command) => run_image(&store, command),
        Command::Tasks(command) => run_tasks(&store, command),
        Command::Examples(command) => run_examples(&store, command),
        Command::Gallery(command) => run_gallery(&store, command),
        Command::Theme(command) => run_theme(&store, command),
        Command::Templates(command) => run_templates(command),
        Command::Session => session::run_session(open_workbench(&store)?, store),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|dir| dir.join("promptsmith"))
        .with_context(|| format!("no data directory found; pass --data-dir or set {DATA_DIR_ENV}"))
}

fn open_store(data_dir: &Path) -> Result<LocalStore> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
    let store = FileStore::new(data_dir.join(STORE_FILE_NAME));
    log::debug!(
        "using store {} ({} key(s))",
        store.path().display(),
        store.keys().len()
    );
    Ok(LocalStore::new(store))
}

pub(crate) fn open_workbench(store: &LocalStore) -> Result<Workbench> {
    let client = GeminiClient::from_env()?;
    let config = client.config();
    log::debug!(
        "text model {}, image model {}, api base {}",
        config.text_model,
        config.image_model,
        config.api_base
    );
    Ok(Workbench::new(Arc::new(client), store.clone()))
}

/// Full id for a user-supplied id or unique prefix.
pub(crate) fn require_id(kind: &str, raw: &str, resolved: Option<String>) -> Result<String> {
    match resolved {
        Some(id) => Ok(id),
        None => bail!("no {kind} matches id '{}'", raw.trim()),
    }
}

fn run_optimize(store: &LocalStore, args: OptimizeArgs) -> Result<()> {
    let prompt = match (args.prompt, args.template) {
        (Some(prompt), _) => prompt,
        (None, Some(query)) => TemplateCatalog::new().find(&query)?.prompt.to_string(),
        (None, None) => String::new(),
    };
    let mut workbench = open_workbench(store)?;
    workbench.set_prompt(prompt);
    for model in args.models {
        if !workbench.selection().is_selected(model) {
            workbench.toggle_model(model);
        }
    }
    let optimized = workbench.optimize()?;
    println!("Target models: {}", workbench.selection().joined());
    println!();
    println!("Original prompt:");
    println!("{}", workbench.prompt().trim());
    println!();
    println!("Optimized prompt:");
    println!("{optimized}");
    if args.diff {
        println!();
        println!("Changes:");
        println!("{}", render::word_diff(workbench.prompt().trim(), &optimized));
    }
    if let Some(aspect_ratio) = args.generate_image {
        let image = workbench.generate_image_from_optimized(aspect_ratio)?;
        println!();
        print_generated(&image);
    }
    Ok(())
}

fn run_image(store: &LocalStore, command: ImageCommand) -> Result<()> {
    let mut workbench = open_workbench(store)?;
    match command {
        ImageCommand::Generate {
            prompt,
            aspect_ratio,
            out,
        } => {
            let image = workbench.generate_image(&prompt, aspect_ratio)?;
            print_generated(&image);
            if let Some(path) = out {
                let written = write_image(&image, &path)?;
                println!("Wrote {}", written.display());
            }
        }
        ImageCommand::Analyze { image, question } => {
            let bytes =
                fs::read(&image).with_context(|| format!("failed to read {}", image.display()))?;
            let mime = render::image_mime(&image, &bytes);
            let answer = workbench.analyze_image(&bytes, mime, &question)?;
            println!("{answer}");
        }
    }
    Ok(())
}

fn run_tasks(store: &LocalStore, command: TaskCommand) -> Result<()> {
    let mut tasks = TaskList::load(store.clone());
    match command {
        TaskCommand::List => print_tasks(&tasks),
        TaskCommand::Add { text } => match tasks.add(&text)? {
            Some(task) => println!("{}", render::task_line(&task)),
            None => println!("Nothing to add."),
        },
        TaskCommand::Done { id } => {
            let id = require_id("task", &id, tasks.resolve_id(&id))?;
            tasks.toggle_completed(&id)?;
            if let Some(task) = tasks.get(&id) {
                println!("{}", render::task_line(task));
            }
        }
        TaskCommand::Edit { id, text } => {
            let id = require_id("task", &id, tasks.resolve_id(&id))?;
            if !tasks.update(&id, &text)? {
                println!("Task text unchanged.");
            }
            if let Some(task) = tasks.get(&id) {
                println!("{}", render::task_line(task));
            }
        }
        TaskCommand::Delete { id } => {
            let id = require_id("task", &id, tasks.resolve_id(&id))?;
            tasks.delete(&id)?;
            println!("Deleted task {}", render::short_id(&id));
        }
    }
    Ok(())
}

pub(crate) fn print_tasks(tasks: &TaskList) {
    if tasks.list().is_empty() {
        println!("No tasks yet.");
        return;
    }
    for task in tasks.list() {
        println!("{}", render::task_line(task));
    }
    println!("{} remaining", tasks.remaining());
}

fn run_examples(store: &LocalStore, command: ExampleCommand) -> Result<()> {
    let mut examples = FewShotLibrary::load(store.clone());
    match command {
        ExampleCommand::List => print_examples(&examples),
        ExampleCommand::Add { input, output } => {
            let example = examples.add()?;
            if input.is_some() || output.is_some() {
                examples.update(
                    &example.id,
                    input.as_deref().unwrap_or_default(),
                    output.as_deref().unwrap_or_default(),
                )?;
            }
            println!("Added example {}", render::short_id(&example.id));
        }
        ExampleCommand::Set { id, input, output } => {
            let id = require_id("example", &id, examples.resolve_id(&id))?;
            if examples.update(&id, &input, &output)? {
                println!("Updated example {}", render::short_id(&id));
            } else {
                println!("Example unchanged.");
            }
        }
        ExampleCommand::Delete { id } => {
            let id = require_id("example", &id, examples.resolve_id(&id))?;
            examples.delete(&id)?;
            println!("Deleted example {}", render::short_id(&id));
        }
    }
    Ok(())
}

pub(crate) fn print_examples(examples: &FewShotLibrary) {
    if examples.list().is_empty() {
        println!("No few-shot examples yet.");
        return;
    }
    for (index, example) in examples.list().iter().enumerate() {
        for line in render::example_lines(index, example) {
            println!("{line}");
        }
    }
}

fn run_gallery(store: &LocalStore, command: GalleryCommand) -> Result<()> {
    let mut gallery = Gallery::load(store.clone());
    match command {
        GalleryCommand::List => print_gallery(&gallery),
        GalleryCommand::Rename { id, prompt } => {
            let id = require_id("image", &id, gallery.resolve_id(&id))?;
            if gallery.update_prompt(&id, &prompt)? {
                println!("Renamed image {}", render::short_id(&id));
            } else {
                println!("Image prompt unchanged.");
            }
        }
        GalleryCommand::Export { id, path } => {
            let id = require_id("image", &id, gallery.resolve_id(&id))?;
            if let Some(image) = gallery.get(&id) {
                let written = write_image(image, &path)?;
                println!("Wrote {}", written.display());
            }
        }
        GalleryCommand::Delete { id } => {
            let id = require_id("image", &id, gallery.resolve_id(&id))?;
            gallery.delete(&id)?;
            println!("Deleted image {}", render::short_id(&id));
        }
        GalleryCommand::Clear { yes } => {
            let count = gallery.list().len();
            if count == 0 {
                println!("Gallery is already empty.");
            } else if !yes {
                bail!("refusing to clear {count} image(s) without --yes");
            } else {
                gallery.clear_all()?;
                println!("Cleared {count} image(s).");
            }
        }
    }
    Ok(())
}

pub(crate) fn print_gallery(gallery: &Gallery) {
    if gallery.is_empty() {
        println!("Gallery is empty.");
        return;
    }
    for image in gallery.list() {
        println!("{}", render::image_line(image));
    }
}

pub(crate) fn print_generated(image: &GeneratedImageData) {
    println!(
        "Generated image {} ({}) and added it to the gallery.",
        render::short_id(&image.id),
        image.aspect_ratio
    );
}

/// Decodes the stored payload into `path`; returns the path written.
pub(crate) fn write_image(image: &GeneratedImageData, path: &Path) -> Result<PathBuf> {
    let bytes = BASE64
        .decode(image.image_data.as_bytes())
        .with_context(|| format!("image {} has invalid base64 data", image.id))?;
    let path = render::export_path(path, &bytes);
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("exported image {} to {}", image.id, path.display());
    Ok(path)
}

fn run_theme(store: &LocalStore, command: ThemeCommand) -> Result<()> {
    let mut preference = ThemePreference::load(store.clone());
    match command {
        ThemeCommand::Show => println!("{}", preference.current()),
        ThemeCommand::Set { theme } => {
            preference.set(theme)?;
            println!("Theme set to {theme}");
        }
    }
    Ok(())
}

fn run_templates(command: TemplateCommand) -> Result<()> {
    let catalog = TemplateCatalog::new();
    match command {
        TemplateCommand::List => print_templates(&catalog),
        TemplateCommand::Show { name } => {
            let template = catalog.find(&name)?;
            println!("{} ({})", template.title, template.slug);
            println!("{}", template.description);
            println!();
            println!("{}", template.prompt);
        }
    }
    Ok(())
}

pub(crate) fn print_templates(catalog: &TemplateCatalog) {
    for (index, template) in catalog.list().enumerate() {
        println!("{}", render::template_line(index, template));
    }
}
