use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use comfy_table::{Cell, Color, Table};
use tracing::{debug, info_span};

use isagrid_cli::export::{apply_table_style, layout_table, rows_table, write_csv};
use isagrid_grid::{
    ColumnLayout, DeleteVerdict, GridContext, GridSettings, StudySession, build_columns,
    build_rows, commit_edit,
};
use isagrid_model::{ColType, DisplayConfig, EditConfig, GridId, ObjectRef, OntologyTerm};
use isagrid_sync::SheetPayload;
use isagrid_validate::EditInput;

use crate::cli::{CanDeleteArgs, ColumnsArgs, RowsArgs, SheetArgs, ValidateArgs};

/// Sheet and configuration loaded from the command line inputs.
struct LoadedSheet {
    payload: SheetPayload,
    settings: GridSettings,
    display: Option<DisplayConfig>,
    protocols: Vec<ObjectRef>,
}

impl LoadedSheet {
    fn load(args: &SheetArgs) -> Result<Self> {
        let payload = load_sheet(&args.sheet)?;
        let settings = match &args.settings {
            Some(path) => GridSettings::load_from(path)
                .with_context(|| format!("load settings {}", path.display()))?,
            None => GridSettings::default(),
        };
        let display = match &args.display {
            Some(path) => Some(read_json(path)?),
            None => payload.display_config.clone(),
        };
        let protocols = match &args.protocols {
            Some(path) => read_json(path)?,
            None => Vec::new(),
        };
        Ok(Self {
            payload,
            settings,
            display,
            protocols,
        })
    }

    fn context<'a>(&'a self, args: &'a SheetArgs, edit: bool) -> Result<GridContext<'a>> {
        let mut ctx = GridContext::view(&args.study, &self.settings).with_protocols(&self.protocols);
        if let Some(display) = &self.display {
            ctx = ctx.with_display(display);
        }
        if let Some(assay) = &args.assay {
            ctx = ctx.for_assay(assay);
        }
        if edit {
            let edit_config: &EditConfig = self
                .payload
                .edit_config
                .as_ref()
                .ok_or_else(|| anyhow!("sheet {} has no edit configuration", args.sheet.display()))?;
            ctx = ctx.edit(edit_config);
        }
        Ok(ctx)
    }
}

fn load_sheet(path: &Path) -> Result<SheetPayload> {
    let json = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    SheetPayload::from_json(&json).with_context(|| format!("parse sheet {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parse {}", path.display()))
}

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let span = info_span!("columns", sheet = %args.sheet.sheet.display());
    let _guard = span.enter();
    let sheet = LoadedSheet::load(&args.sheet)?;
    let ctx = sheet.context(&args.sheet, args.sheet.edit)?;
    let layout = build_columns(&sheet.payload.table, &ctx).context("build columns")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        println!("{}", layout_table(&layout));
    }
    Ok(())
}

pub fn run_rows(args: &RowsArgs) -> Result<()> {
    let span = info_span!("rows", sheet = %args.sheet.sheet.display());
    let _guard = span.enter();
    let sheet = LoadedSheet::load(&args.sheet)?;
    let ctx = sheet.context(&args.sheet, args.sheet.edit)?;
    let table = &sheet.payload.table;
    let layout = build_columns(table, &ctx).context("build columns")?;
    let rows = build_rows(table, &layout, &ctx).context("build rows")?;
    if let Some(path) = &args.csv {
        let file = fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
        write_csv(&layout, &rows, file).with_context(|| format!("write {}", path.display()))?;
        debug!(rows = rows.len(), path = %path.display(), "wrote csv");
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{}", rows_table(&layout, &rows));
    }
    Ok(())
}

/// Returns whether the edit was accepted.
pub fn run_validate(args: &ValidateArgs) -> Result<bool> {
    let span = info_span!("validate", row = args.row, col = args.col);
    let _guard = span.enter();
    let sheet = LoadedSheet::load(&args.sheet)?;
    let ctx = sheet.context(&args.sheet, true)?;
    let mut table = sheet.payload.table.clone();
    let layout = build_columns(&table, &ctx).context("build columns")?;
    let input = edit_input(&layout, args)?;
    match commit_edit(&mut table, &layout, &ctx, args.row, args.col, &input) {
        Ok(update) => {
            println!("accepted: {}", update.cell.display());
            Ok(true)
        }
        Err(error) => {
            println!("rejected: {error}");
            Ok(false)
        }
    }
}

fn edit_input(layout: &ColumnLayout, args: &ValidateArgs) -> Result<EditInput> {
    let leaf = layout
        .leaf(args.col)
        .ok_or_else(|| anyhow!("column {} does not exist", args.col))?;
    if leaf.sample_column {
        return Ok(EditInput::Reference(args.value.clone()));
    }
    Ok(match leaf.col_type {
        Some(ColType::Unit) => EditInput::Unit {
            value: args.value.clone(),
            unit: args.unit.clone(),
        },
        Some(ColType::Ontology) => {
            let terms: Vec<OntologyTerm> =
                serde_json::from_str(&args.value).context("parse term list JSON")?;
            EditInput::Terms(terms)
        }
        Some(ColType::Protocol) => EditInput::Reference(args.value.clone()),
        _ => EditInput::Text(args.value.clone()),
    })
}

pub fn run_can_delete(args: &CanDeleteArgs) -> Result<()> {
    let span = info_span!("can_delete", sheet = %args.sheet.sheet.display());
    let _guard = span.enter();
    let study = load_sheet(&args.sheet.sheet)?;
    let mut session = StudySession::new(&args.sheet.study, study.table);
    for entry in &args.assay_sheets {
        let Some((uuid, path)) = entry.split_once('=') else {
            bail!("assay sheet '{entry}' is not UUID=PATH");
        };
        let assay = load_sheet(Path::new(path))?;
        session.add_assay(uuid, assay.table);
    }

    let grid = GridId::Study;
    let mut table = Table::new();
    table.set_header(vec!["Row", "Verdict", "Reason"]);
    apply_table_style(&mut table);
    for row in 0..session.table(&grid)?.row_count() {
        let verdict = session.delete_verdict(&grid, row)?;
        let code = match verdict {
            DeleteVerdict::Ok => Cell::new(verdict.code()).fg(Color::Green),
            _ => Cell::new(verdict.code()).fg(Color::Yellow),
        };
        table.add_row(vec![Cell::new(row), code, Cell::new(verdict.message())]);
    }
    println!("{table}");
    Ok(())
}
