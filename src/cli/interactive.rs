use crate::application::interactive::{FormCommand, QueryForm};
use crate::application::present::ResultPresenter;
use crate::application::query::QueryService;
use crate::cli::gallery::{print_gallery, save_gallery};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

const HELP: &str = "\
Commands:
  mode text|image    choose the query mode
  text <query>       set the text query (switches to text mode)
  image <path>       set the query image (switches to image mode)
  n <1-10>           number of results
  go                 run the query
  show               print the current form
  quit               leave";

/// Line-driven search loop. Each `go` runs one blocking query-then-present
/// cycle; commands typed meanwhile queue behind it.
pub async fn run_interactive<R, W>(
    service: &QueryService,
    presenter: &ResultPresenter,
    input: R,
    out: &mut W,
    gallery_dir: Option<&Path>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut form = QueryForm::new();
    let mut lines = input.lines();
    writeln!(out, "Searching collection '{}'. Type 'help' for commands.", service.collection().name())?;

    loop {
        write!(out, "[{} | n={}]> ", form.mode, form.result_count)?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<FormCommand>() {
            Ok(c) => c,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        if let Err(e) = form.apply(&command) {
            writeln!(out, "{e}")?;
            continue;
        }

        match command {
            FormCommand::Quit => break,
            FormCommand::Help => writeln!(out, "{HELP}")?,
            FormCommand::Show => writeln!(
                out,
                "mode: {}\ntext: {}\nimage: {}\nn: {}",
                form.mode,
                form.text,
                form.image_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                form.result_count
            )?,
            FormCommand::Submit => {
                let items = form.submit(service, presenter).await;
                print_gallery(out, &items)?;
                if let Some(dir) = gallery_dir {
                    match save_gallery(&items, dir) {
                        Ok(paths) if !paths.is_empty() => {
                            writeln!(out, "Saved {} images to {}", paths.len(), dir.display())?
                        }
                        Ok(_) => {}
                        Err(e) => warn!(error = %e, "Could not save gallery"),
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}
