use anyhow::Result;
use log::info;

use crate::{cli::PreviewArgs, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let loaded = crate::load_dataset(&args.dataset)?;
    let preview = loaded.head(args.rows);
    table::print_table(preview.headers(), &preview.to_string_rows());
    info!(
        "Displayed {} of {} row(s) from the selected dataset",
        preview.len(),
        loaded.len()
    );
    Ok(())
}
