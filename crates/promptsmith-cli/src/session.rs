use std::fs;
use std::io::{self, BufRead, ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};
use promptsmith_contracts::collections::TaskList;
use promptsmith_contracts::models::{AspectRatio, TargetModel};
use promptsmith_contracts::session::{parse_intent, Intent, SESSION_HELP_COMMANDS};
use promptsmith_contracts::store::LocalStore;
use promptsmith_contracts::templates::TemplateCatalog;
use promptsmith_contracts::theme::{Theme, ThemePreference};
use promptsmith_engine::Workbench;

use crate::render;

enum Flow {
    Continue,
    Quit,
}

struct Session {
    workbench: Workbench,
    tasks: TaskList,
    theme: ThemePreference,
    catalog: TemplateCatalog,
}

pub(crate) fn run_session(workbench: Workbench, store: LocalStore) -> Result<()> {
    let mut session = Session {
        workbench,
        tasks: TaskList::load(store.clone()),
        theme: ThemePreference::load(store),
        catalog: TemplateCatalog::new(),
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    println!("promptsmith session started. Type /help for commands.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        let read = match input.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            break;
        }

        let intent = parse_intent(line.trim_end_matches(['\n', '\r']));
        if intent.action == "noop" {
            continue;
        }
        match session.handle(&intent, &mut input) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => println!("error: {err:#}"),
        }
    }
    Ok(())
}

impl Session {
    fn handle(&mut self, intent: &Intent, input: &mut impl BufRead) -> Result<Flow> {
        match intent.action.as_str() {
            "help" => println!("Commands: {}", SESSION_HELP_COMMANDS.join(" ")),
            "quit" => return Ok(Flow::Quit),
            "status" => self.print_status(),
            "list_models" => {
                for model in TargetModel::ALL {
                    let selected = self.workbench.selection().is_selected(model);
                    println!("{}", render::model_line(model, selected));
                }
            }
            "toggle_model" => {
                let model = arg(intent, "model").parse::<TargetModel>()?;
                let selected = self.workbench.toggle_model(model);
                let state = if selected { "selected" } else { "deselected" };
                println!("{model} {state}. Selected: {}", self.selected_label());
            }
            "set_prompt" => {
                let prompt = intent
                    .prompt
                    .clone()
                    .unwrap_or_else(|| arg(intent, "prompt").to_string());
                self.workbench.set_prompt(prompt);
                println!("Prompt set.");
            }
            "list_templates" => crate::print_templates(&self.catalog),
            "use_template" => {
                let template = self.catalog.find(arg(intent, "template"))?;
                self.workbench.set_prompt(template.prompt);
                println!("Prompt set from template '{}'.", template.title);
            }
            "optimize" => {
                let optimized = self.workbench.optimize()?;
                println!("Optimized prompt:");
                println!("{optimized}");
            }
            "generate_image" => {
                let ratio = ratio_arg(intent)?;
                let image = self.workbench.generate_image(arg(intent, "prompt"), ratio)?;
                crate::print_generated(&image);
            }
            "generate_image_from_optimized" => {
                let ratio = ratio_arg(intent)?;
                let image = self.workbench.generate_image_from_optimized(ratio)?;
                crate::print_generated(&image);
            }
            "analyze_image" => {
                let raw_path = arg(intent, "path");
                let bytes = if raw_path.is_empty() {
                    Vec::new()
                } else {
                    fs::read(raw_path).with_context(|| format!("failed to read {raw_path}"))?
                };
                let mime = render::image_mime(Path::new(raw_path), &bytes);
                let answer = self
                    .workbench
                    .analyze_image(&bytes, mime, arg(intent, "question"))?;
                println!("{answer}");
            }
            "list_tasks" => crate::print_tasks(&self.tasks),
            "add_task" => {
                if let Some(task) = self.tasks.add(arg(intent, "text"))? {
                    println!("{}", render::task_line(&task));
                }
            }
            "toggle_task" => {
                let id = self.task_id(intent)?;
                self.tasks.toggle_completed(&id)?;
                if let Some(task) = self.tasks.get(&id) {
                    println!("{}", render::task_line(task));
                }
            }
            "edit_task" => {
                let id = self.task_id(intent)?;
                self.tasks.update(&id, arg(intent, "text"))?;
                if let Some(task) = self.tasks.get(&id) {
                    println!("{}", render::task_line(task));
                }
            }
            "delete_task" => {
                let id = self.task_id(intent)?;
                self.tasks.delete(&id)?;
                println!("Deleted task {}", render::short_id(&id));
            }
            "list_examples" => crate::print_examples(self.workbench.examples()),
            "add_example" => {
                let example = self.workbench.examples_mut().add()?;
                println!("Added example {}", render::short_id(&example.id));
            }
            "update_example" => {
                let raw = arg(intent, "id");
                let resolved = self.workbench.examples().resolve_id(raw);
                let id = crate::require_id("example", raw, resolved)?;
                let changed = self.workbench.examples_mut().update(
                    &id,
                    arg(intent, "input"),
                    arg(intent, "output"),
                )?;
                let verb = if changed { "Updated" } else { "Unchanged" };
                println!("{verb} example {}", render::short_id(&id));
            }
            "delete_example" => {
                let raw = arg(intent, "id");
                let resolved = self.workbench.examples().resolve_id(raw);
                let id = crate::require_id("example", raw, resolved)?;
                self.workbench.examples_mut().delete(&id)?;
                println!("Deleted example {}", render::short_id(&id));
            }
            "list_gallery" => crate::print_gallery(self.workbench.gallery()),
            "rename_image" => {
                let id = self.image_id(intent)?;
                if self
                    .workbench
                    .gallery_mut()
                    .update_prompt(&id, arg(intent, "prompt"))?
                {
                    println!("Renamed image {}", render::short_id(&id));
                }
            }
            "delete_image" => {
                let id = self.image_id(intent)?;
                self.workbench.gallery_mut().delete(&id)?;
                println!("Deleted image {}", render::short_id(&id));
            }
            "clear_gallery" => {
                let count = self.workbench.gallery().list().len();
                if count == 0 {
                    println!("Gallery is already empty.");
                } else if confirm(&format!("Clear all {count} image(s)?"), input)? {
                    self.workbench.gallery_mut().clear_all()?;
                    println!("Cleared {count} image(s).");
                }
            }
            "set_theme" => {
                let theme = arg(intent, "theme").parse::<Theme>()?;
                self.theme.set(theme)?;
                println!("Theme set to {theme}");
            }
            "unknown" => {
                println!(
                    "Unknown command /{}. Type /help for commands.",
                    arg(intent, "command")
                );
            }
            other => log::debug!("unhandled session action {other}"),
        }
        Ok(Flow::Continue)
    }

    fn selected_label(&self) -> String {
        let selection = self.workbench.selection();
        if selection.is_empty() {
            "none".to_string()
        } else {
            selection.joined()
        }
    }

    fn print_status(&self) {
        println!("Models: {}", self.selected_label());
        let prompt = self.workbench.prompt().trim();
        if prompt.is_empty() {
            println!("Prompt: (empty)");
        } else {
            println!("Prompt: {}", render::preview(prompt));
        }
        if let Some(optimized) = self.workbench.optimized_prompt() {
            println!("Optimized: {}", render::preview(optimized));
        }
        if let Some(error) = self.workbench.last_error() {
            println!("Last error: {error}");
        }
        println!(
            "Tasks: {} ({} remaining)  Examples: {}  Gallery: {}  Theme: {}",
            self.tasks.list().len(),
            self.tasks.remaining(),
            self.workbench.examples().list().len(),
            self.workbench.gallery().list().len(),
            self.theme.current()
        );
    }

    fn task_id(&self, intent: &Intent) -> Result<String> {
        let raw = arg(intent, "id");
        crate::require_id("task", raw, self.tasks.resolve_id(raw))
    }

    fn image_id(&self, intent: &Intent) -> Result<String> {
        let raw = arg(intent, "id");
        crate::require_id("image", raw, self.workbench.gallery().resolve_id(raw))
    }
}

fn arg<'a>(intent: &'a Intent, key: &str) -> &'a str {
    intent.arg_str(key).map(str::trim).unwrap_or_default()
}

fn ratio_arg(intent: &Intent) -> Result<AspectRatio> {
    match intent.arg_str("aspect_ratio") {
        Some(raw) => Ok(raw.parse::<AspectRatio>()?),
        None => Ok(AspectRatio::default()),
    }
}

fn confirm(question: &str, input: &mut impl BufRead) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
