use crate::application::present::GalleryItem;
use crate::domain::error::DomainError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Saves each item as `NN-<id>.png` in rank order.
pub fn save_gallery(items: &[GalleryItem], dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| DomainError::InvalidInput(format!("Cannot create {}: {e}", dir.display())))?;
    items
        .iter()
        .enumerate()
        .map(|(rank, item)| {
            let path = dir.join(format!("{:02}-{}.png", rank + 1, item.id));
            item.image
                .save(&path)
                .map_err(|e| DomainError::Decode(format!("Cannot write {}: {e}", path.display())))?;
            Ok(path)
        })
        .collect()
}

pub fn print_gallery(out: &mut impl Write, items: &[GalleryItem]) -> std::io::Result<()> {
    if items.is_empty() {
        writeln!(out, "No results.")?;
    }
    for (rank, item) in items.iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {} [{}x{}]",
            rank + 1,
            item.caption,
            item.image.width(),
            item.image.height()
        )?;
    }
    Ok(())
}
