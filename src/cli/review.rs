use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::calc::calculate;
use crate::error::Result;
use crate::fmt::{edit_number, format_bytes, parse_money};
use crate::models::{
    BankData, CategoryData, CategoryKey, CryptoData, InvestmentsData, LoansData, RealEstateData,
    Status,
};
use crate::store::Store;
use crate::tui::{
    money_span, run_store_view, status_span, wrap_text, StoreView, ViewAction, FOOTER_STYLE,
    HEADER_STYLE, SELECTED_STYLE,
};

/// What a form field holds. Money fields go through `parse_money` on save.
#[derive(Clone, Copy, PartialEq)]
enum FieldKind {
    Text,
    Money,
}

struct FieldDef {
    label: &'static str,
    kind: FieldKind,
}

const BANK_FIELDS: &[FieldDef] = &[
    FieldDef { label: "Bank", kind: FieldKind::Text },
    FieldDef { label: "IBAN", kind: FieldKind::Text },
    FieldDef { label: "Begin balance", kind: FieldKind::Money },
    FieldDef { label: "End balance", kind: FieldKind::Money },
    FieldDef { label: "Interest", kind: FieldKind::Money },
    FieldDef { label: "Fees", kind: FieldKind::Money },
    FieldDef { label: "Note", kind: FieldKind::Text },
];

const INVESTMENTS_FIELDS: &[FieldDef] = &[
    FieldDef { label: "Broker", kind: FieldKind::Text },
    FieldDef { label: "Begin value", kind: FieldKind::Money },
    FieldDef { label: "End value", kind: FieldKind::Money },
    FieldDef { label: "Deposits", kind: FieldKind::Money },
    FieldDef { label: "Withdrawals", kind: FieldKind::Money },
    FieldDef { label: "Dividends", kind: FieldKind::Money },
    FieldDef { label: "Costs", kind: FieldKind::Money },
    FieldDef { label: "Note", kind: FieldKind::Text },
];

const REAL_ESTATE_FIELDS: &[FieldDef] = &[
    FieldDef { label: "Address", kind: FieldKind::Text },
    FieldDef { label: "Assessed value", kind: FieldKind::Money },
    FieldDef { label: "Use type", kind: FieldKind::Text },
    FieldDef { label: "Rent", kind: FieldKind::Money },
    FieldDef { label: "Imputed income", kind: FieldKind::Money },
    FieldDef { label: "Maintenance", kind: FieldKind::Money },
    FieldDef { label: "Note", kind: FieldKind::Text },
];

const LOANS_FIELDS: &[FieldDef] = &[
    FieldDef { label: "Counterparty", kind: FieldKind::Text },
    FieldDef { label: "Principal begin", kind: FieldKind::Money },
    FieldDef { label: "Principal end", kind: FieldKind::Money },
    FieldDef { label: "Interest received", kind: FieldKind::Money },
    FieldDef { label: "Interest paid", kind: FieldKind::Money },
    FieldDef { label: "Note", kind: FieldKind::Text },
];

const CRYPTO_FIELDS: &[FieldDef] = &[
    FieldDef { label: "Exchange", kind: FieldKind::Text },
    FieldDef { label: "Begin value", kind: FieldKind::Money },
    FieldDef { label: "End value", kind: FieldKind::Money },
    FieldDef { label: "Staking", kind: FieldKind::Money },
    FieldDef { label: "Fees", kind: FieldKind::Money },
    FieldDef { label: "Note", kind: FieldKind::Text },
];

fn field_defs(key: CategoryKey) -> &'static [FieldDef] {
    match key {
        CategoryKey::Bank => BANK_FIELDS,
        CategoryKey::Investments => INVESTMENTS_FIELDS,
        CategoryKey::RealEstate => REAL_ESTATE_FIELDS,
        CategoryKey::Loans => LOANS_FIELDS,
        CategoryKey::Crypto => CRYPTO_FIELDS,
    }
}

/// Stored figures flattened into one editable string per field, in the
/// same order as the field defs.
fn draft_from(key: CategoryKey, data: Option<&CategoryData>) -> Vec<String> {
    match data {
        Some(CategoryData::Bank(d)) => vec![
            d.bank.clone(),
            d.iban.clone(),
            edit_number(d.begin),
            edit_number(d.end),
            edit_number(d.interest),
            edit_number(d.fees),
            d.note.clone(),
        ],
        Some(CategoryData::Investments(d)) => vec![
            d.broker.clone(),
            edit_number(d.begin_value),
            edit_number(d.end_value),
            edit_number(d.deposits),
            edit_number(d.withdrawals),
            edit_number(d.dividends),
            edit_number(d.costs),
            d.note.clone(),
        ],
        Some(CategoryData::RealEstate(d)) => vec![
            d.address.clone(),
            edit_number(d.assessed_value),
            d.use_type.clone(),
            edit_number(d.rent),
            edit_number(d.imputed_income),
            edit_number(d.maintenance),
            d.note.clone(),
        ],
        Some(CategoryData::Loans(d)) => vec![
            d.counterparty.clone(),
            edit_number(d.principal_begin),
            edit_number(d.principal_end),
            edit_number(d.interest_received),
            edit_number(d.interest_paid),
            d.note.clone(),
        ],
        Some(CategoryData::Crypto(d)) => vec![
            d.exchange.clone(),
            edit_number(d.begin_value),
            edit_number(d.end_value),
            edit_number(d.staking),
            edit_number(d.fees),
            d.note.clone(),
        ],
        None => vec![String::new(); field_defs(key).len()],
    }
}

/// Read the form back into typed figures. Money fields parse through
/// `parse_money`, so junk input lands as 0.
fn draft_to_data(key: CategoryKey, draft: &[String]) -> CategoryData {
    let text = |i: usize| draft.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
    let num = |i: usize| draft.get(i).map(|s| parse_money(s)).unwrap_or(0.0);
    match key {
        CategoryKey::Bank => CategoryData::Bank(BankData {
            bank: text(0),
            iban: text(1),
            begin: num(2),
            end: num(3),
            interest: num(4),
            fees: num(5),
            note: text(6),
        }),
        CategoryKey::Investments => CategoryData::Investments(InvestmentsData {
            broker: text(0),
            begin_value: num(1),
            end_value: num(2),
            deposits: num(3),
            withdrawals: num(4),
            dividends: num(5),
            costs: num(6),
            note: text(7),
        }),
        CategoryKey::RealEstate => {
            let mut use_type = text(2);
            if use_type.is_empty() {
                use_type = "mixed".to_string();
            }
            CategoryData::RealEstate(RealEstateData {
                address: text(0),
                assessed_value: num(1),
                use_type,
                rent: num(3),
                imputed_income: num(4),
                maintenance: num(5),
                note: text(6),
            })
        }
        CategoryKey::Loans => CategoryData::Loans(LoansData {
            counterparty: text(0),
            principal_begin: num(1),
            principal_end: num(2),
            interest_received: num(3),
            interest_paid: num(4),
            note: text(5),
        }),
        CategoryKey::Crypto => CategoryData::Crypto(CryptoData {
            exchange: text(0),
            begin_value: num(1),
            end_value: num(2),
            staking: num(3),
            fees: num(4),
            note: text(5),
        }),
    }
}

enum Pane {
    Files,
    Form,
}

enum Mode {
    Browse,
    EditField,
    AttachInput,
}

/// Interactive review of one category: documents on the left, the figures
/// form on the right, actions along the bottom.
pub struct CategoryReviewer {
    key: CategoryKey,
    pane: Pane,
    mode: Mode,
    file_sel: usize,
    field_sel: usize,
    draft: Vec<String>,
    input: String,
    message: Option<String>,
}

impl CategoryReviewer {
    pub fn new(key: CategoryKey, store: &Store) -> Self {
        Self {
            key,
            pane: Pane::Form,
            mode: Mode::Browse,
            file_sel: 0,
            field_sel: 0,
            draft: draft_from(key, store.record(key).data.as_ref()),
            input: String::new(),
            message: None,
        }
    }

    /// Re-read the draft after a store mutation seeded or replaced data.
    fn reload_draft(&mut self, store: &Store) {
        self.draft = draft_from(self.key, store.record(self.key).data.as_ref());
    }

    fn attach_path(&mut self, raw: &str, store: &mut Store) {
        match super::files::file_ref(raw) {
            Ok(file) => {
                store.attach(self.key, vec![file]);
                self.reload_draft(store);
                self.message = Some("Document attached.".to_string());
            }
            Err(e) => self.message = Some(format!("{e}")),
        }
    }

    fn remove_selected(&mut self, store: &mut Store) {
        let count = store.record(self.key).files.len();
        if count == 0 {
            self.message = Some("No documents to remove.".to_string());
            return;
        }
        let idx = self.file_sel.min(count - 1);
        match store.remove_file(self.key, idx) {
            Ok(removed) => {
                let left = store.record(self.key).files.len();
                self.file_sel = self.file_sel.min(left.saturating_sub(1));
                self.message = Some(format!("Removed {}.", removed.name));
            }
            Err(e) => self.message = Some(format!("{e}")),
        }
    }

    fn save(&mut self, store: &mut Store) {
        let data = draft_to_data(self.key, &self.draft);
        match store.save_review(data) {
            Ok(()) => {
                self.reload_draft(store);
                self.message = Some("Saved. Marked done.".to_string());
            }
            Err(e) => self.message = Some(format!("{e}")),
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode, store: &mut Store) -> ViewAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Close,
            KeyCode::Tab => {
                self.pane = match self.pane {
                    Pane::Files => Pane::Form,
                    Pane::Form => Pane::Files,
                };
            }
            KeyCode::Up => match self.pane {
                Pane::Files => self.file_sel = self.file_sel.saturating_sub(1),
                Pane::Form => self.field_sel = self.field_sel.saturating_sub(1),
            },
            KeyCode::Down => match self.pane {
                Pane::Files => {
                    let count = store.record(self.key).files.len();
                    if count > 0 {
                        self.file_sel = (self.file_sel + 1).min(count - 1);
                    }
                }
                Pane::Form => {
                    self.field_sel = (self.field_sel + 1).min(field_defs(self.key).len() - 1);
                }
            },
            KeyCode::Enter => {
                if matches!(self.pane, Pane::Form) {
                    self.input = self.draft[self.field_sel].clone();
                    self.mode = Mode::EditField;
                }
            }
            KeyCode::Char('a') => {
                self.input.clear();
                self.mode = Mode::AttachInput;
            }
            KeyCode::Char('d') => {
                if matches!(self.pane, Pane::Files) {
                    self.remove_selected(store);
                }
            }
            KeyCode::Char('e') => {
                store.load_example(self.key);
                self.reload_draft(store);
                self.message = Some("Example data loaded.".to_string());
            }
            KeyCode::Char('w') => {
                if self.key == CategoryKey::RealEstate {
                    let address = self.draft.first().cloned().unwrap_or_default();
                    let address = address.trim().to_string();
                    let address = (!address.is_empty()).then_some(address);
                    store.lookup_assessed_value(address.as_deref());
                    self.reload_draft(store);
                    self.message = Some("Assessed value fetched.".to_string());
                }
            }
            KeyCode::Char('s') => self.save(store),
            KeyCode::Char('l') => {
                store.mark_later(self.key);
                self.message = Some("Parked. Back to to-do.".to_string());
            }
            _ => {}
        }
        ViewAction::Continue
    }

    fn draw_view(&self, frame: &mut Frame, store: &Store) {
        let area = frame.area();
        let record = store.record(self.key);
        let defs = field_defs(self.key);
        let calc = calculate(record.data.as_ref());

        // Wrapped note feeds into the summary height, so compute it first
        let note = record.data.as_ref().map(|d| d.note()).unwrap_or("");
        let wrapped_note = if note.is_empty() {
            None
        } else {
            Some(wrap_text(note, area.width.saturating_sub(6) as usize))
        };
        let note_rows = wrapped_note.as_ref().map(|(_, n)| *n).unwrap_or(0);
        let summary_rows = 3 + calc.detail.len() as u16 + note_rows;

        let [header_area, stepper_area, summary_area, main_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(summary_rows),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        // Header: category name plus status pill
        let header = Line::from(vec![
            Span::styled(format!(" {}", self.key.label()), HEADER_STYLE),
            Span::raw("  "),
            status_span(record.status),
        ]);
        frame.render_widget(Paragraph::new(header), header_area);

        // Stepper: upload, review, done, with the current step lit
        let step = |n: u8, label: &str, active: bool| {
            if active {
                Span::styled(
                    format!(" {n} {label} "),
                    Style::new().fg(Color::Black).bg(Color::Yellow),
                )
            } else {
                Span::styled(format!(" {n} {label} "), FOOTER_STYLE)
            }
        };
        let stepper = Line::from(vec![
            Span::raw(" "),
            step(1, "Upload", record.status == Status::Todo),
            Span::raw(" "),
            step(2, "Review", record.status == Status::Warn),
            Span::raw(" "),
            step(3, "Done", record.status == Status::Ok),
        ]);
        frame.render_widget(Paragraph::new(stepper), stepper_area);

        // Summary: result, breakdown, document count, note
        let mut summary = vec![Line::from("")];
        let result_span = if record.data.is_some() {
            money_span(calc.result)
        } else {
            Span::styled("\u{2014}", FOOTER_STYLE)
        };
        summary.push(Line::from(vec![
            Span::raw(format!(" {:<19}", "Result")),
            result_span,
        ]));
        for row in &calc.detail {
            summary.push(Line::from(vec![
                Span::styled(format!("   {:<17}", row.label), FOOTER_STYLE),
                money_span(row.amount),
            ]));
        }
        summary.push(Line::from(format!(
            " {:<19}{}",
            "Documents",
            record.files.len()
        )));
        if let Some((wrapped, _)) = &wrapped_note {
            for line in wrapped.lines() {
                summary.push(Line::from(Span::styled(
                    format!("   {line}"),
                    FOOTER_STYLE,
                )));
            }
        }
        frame.render_widget(Paragraph::new(summary), summary_area);

        let [files_area, form_area] =
            Layout::horizontal([Constraint::Percentage(42), Constraint::Percentage(58)])
                .areas(main_area);

        // Files pane
        let files_active = matches!(self.pane, Pane::Files) && matches!(self.mode, Mode::Browse);
        let mut file_lines = vec![Line::from(Span::styled(
            " Documents",
            Style::new().add_modifier(Modifier::BOLD),
        ))];
        if record.files.is_empty() {
            file_lines.push(Line::from(Span::styled(
                "   none yet (press a to attach)",
                FOOTER_STYLE,
            )));
        } else {
            for (i, file) in record.files.iter().enumerate() {
                let selected = files_active && i == self.file_sel;
                let marker = if selected { ">" } else { " " };
                let style = if selected {
                    SELECTED_STYLE
                } else {
                    Style::default()
                };
                file_lines.push(Line::from(Span::styled(
                    format!(
                        " {marker} {}) {} ({})",
                        i + 1,
                        file.name,
                        format_bytes(file.size)
                    ),
                    style,
                )));
            }
        }
        frame.render_widget(Paragraph::new(file_lines), files_area);

        // Form pane
        let form_active = matches!(self.pane, Pane::Form);
        let mut form_lines = vec![Line::from(Span::styled(
            " Figures",
            Style::new().add_modifier(Modifier::BOLD),
        ))];
        for (i, def) in defs.iter().enumerate() {
            let editing = matches!(self.mode, Mode::EditField) && i == self.field_sel;
            let value = if editing {
                format!("{}\u{2588}", self.input)
            } else {
                self.draft[i].clone()
            };
            let selected = form_active && i == self.field_sel && matches!(self.mode, Mode::Browse);
            let marker = if selected || editing { ">" } else { " " };
            let style = if selected {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            form_lines.push(Line::from(Span::styled(
                format!(" {marker} {:<18} {value}", def.label),
                style,
            )));
        }
        frame.render_widget(Paragraph::new(form_lines), form_area);

        // Bottom line: attach prompt, message, or key hints
        let bottom: Line = match self.mode {
            Mode::AttachInput => Line::from(format!(" Attach path: {}\u{2588}", self.input)),
            Mode::EditField => {
                let hint = if defs[self.field_sel].kind == FieldKind::Money {
                    " Enter=apply  Esc=cancel  (amounts like 1.234,56)"
                } else {
                    " Enter=apply  Esc=cancel"
                };
                Line::from(Span::styled(hint, FOOTER_STYLE))
            }
            Mode::Browse => {
                if let Some(msg) = &self.message {
                    Line::from(Span::styled(
                        format!(" {msg}"),
                        Style::new().fg(Color::Yellow),
                    ))
                } else {
                    let hint = match (&self.pane, self.key) {
                        (Pane::Files, _) => {
                            " Tab=figures  a=attach  d=remove  e=example  s=save  l=later  q=back"
                        }
                        (Pane::Form, CategoryKey::RealEstate) => {
                            " Tab=documents  Enter=edit  w=fetch value  e=example  s=save  l=later  q=back"
                        }
                        (Pane::Form, _) => {
                            " Tab=documents  Enter=edit  e=example  s=save  l=later  q=back"
                        }
                    };
                    Line::from(Span::styled(hint, FOOTER_STYLE))
                }
            }
        };
        frame.render_widget(Paragraph::new(bottom), hints_area);
    }
}

impl StoreView for CategoryReviewer {
    fn draw(&mut self, frame: &mut Frame, store: &Store) {
        self.draw_view(frame, store);
    }

    fn handle_key(&mut self, code: KeyCode, store: &mut Store) -> ViewAction {
        self.message = None;
        match self.mode {
            Mode::EditField => {
                match code {
                    KeyCode::Char(c) => self.input.push(c),
                    KeyCode::Backspace => {
                        self.input.pop();
                    }
                    KeyCode::Enter => {
                        self.draft[self.field_sel] = self.input.trim().to_string();
                        self.input.clear();
                        self.mode = Mode::Browse;
                    }
                    KeyCode::Esc => {
                        self.input.clear();
                        self.mode = Mode::Browse;
                    }
                    _ => {}
                }
                ViewAction::Continue
            }
            Mode::AttachInput => {
                match code {
                    KeyCode::Char(c) => self.input.push(c),
                    KeyCode::Backspace => {
                        self.input.pop();
                    }
                    KeyCode::Enter => {
                        let raw = self.input.trim().to_string();
                        self.input.clear();
                        self.mode = Mode::Browse;
                        if !raw.is_empty() {
                            self.attach_path(&raw, store);
                        }
                    }
                    KeyCode::Esc => {
                        self.input.clear();
                        self.mode = Mode::Browse;
                    }
                    _ => {}
                }
                ViewAction::Continue
            }
            Mode::Browse => self.handle_browse_key(code, store),
        }
    }
}

pub fn run(category: CategoryKey) -> Result<()> {
    let mut store = super::open_store();
    let mut reviewer = CategoryReviewer::new(category, &store);

    let result = run_store_view(&mut reviewer, &mut store);

    if result.is_ok() {
        let record = store.record(category);
        println!(
            "{}: {} ({} document{}).",
            category.label(),
            record.status.label(),
            record.files.len(),
            if record.files.len() == 1 { "" } else { "s" }
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_matches_field_defs_for_every_category() {
        for key in CategoryKey::ALL {
            let empty = draft_from(key, None);
            assert_eq!(empty.len(), field_defs(key).len());
            let filled = draft_from(key, Some(&key.example_data()));
            assert_eq!(filled.len(), field_defs(key).len());
        }
    }

    #[test]
    fn test_draft_roundtrips_example_data() {
        for key in CategoryKey::ALL {
            let data = key.example_data();
            let draft = draft_from(key, Some(&data));
            assert_eq!(draft_to_data(key, &draft), data);
        }
    }

    #[test]
    fn test_empty_draft_builds_zeroed_data() {
        let draft = draft_from(CategoryKey::Bank, None);
        let CategoryData::Bank(d) = draft_to_data(CategoryKey::Bank, &draft) else {
            panic!("wrong variant");
        };
        assert_eq!(d.begin, 0.0);
        assert_eq!(d.bank, "");
    }

    #[test]
    fn test_draft_parses_locale_amounts() {
        let mut draft = draft_from(CategoryKey::Bank, None);
        draft[2] = "32.000".to_string();
        draft[4] = "1.234,56".to_string();
        let CategoryData::Bank(d) = draft_to_data(CategoryKey::Bank, &draft) else {
            panic!("wrong variant");
        };
        assert_eq!(d.begin, 32_000.0);
        assert_eq!(d.interest, 1_234.56);
    }

    #[test]
    fn test_use_type_falls_back_to_mixed() {
        let draft = draft_from(CategoryKey::RealEstate, None);
        let CategoryData::RealEstate(d) = draft_to_data(CategoryKey::RealEstate, &draft) else {
            panic!("wrong variant");
        };
        assert_eq!(d.use_type, "mixed");
    }
}
