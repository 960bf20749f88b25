use std::io::Write;
use std::path::PathBuf;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use rand::seq::SliceRandom;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, LineGauge, Paragraph},
    Frame,
};

use crate::calc::calculate;
use crate::cli::review::CategoryReviewer;
use crate::error::Result;
use crate::fmt::money;
use crate::models::{CategoryKey, Status};
use crate::progress::{self, EXPORT_THRESHOLD};
use crate::settings::{load_settings, save_settings, settings_file_exists, Settings};
use crate::store::Store;
use crate::tui::{
    money_span, status_style, StoreView, ViewAction, AMOUNT_NEG_STYLE, AMOUNT_POS_STYLE,
    FOOTER_STYLE, HEADER_STYLE,
};

const GREETINGS: &[&str] = &[
    "The paperwork won't file itself.",
    "Another year, another shoebox of statements.",
    "Right then, where did the money go?",
    "Five boxes. How hard can it be?",
    "Back again? The checklist missed you.",
    "Shall we get this over with?",
    "Deadline's not getting any further away.",
    "Everything in order? Let's check.",
    "One category at a time.",
    "The tax office sends its regards.",
];

const MENU_ITEMS: &[&str] = &[
    "Open a category",
    "Attach documents",
    "Load example data",
    "Set the filing year",
    "Export the summary",
    "Reset the checklist",
];

enum DashboardScreen {
    Home,
    CategoryPicker { selection: usize },
    Review(CategoryReviewer),
    ConfirmReset,
}

enum TerminalCommand {
    Attach,
    Year,
    Export,
}

struct HomeRow {
    key: CategoryKey,
    status: Status,
    files: usize,
    result: Option<f64>,
}

struct HomeData {
    year: String,
    pct: u8,
    done: usize,
    review: usize,
    todo: usize,
    file_count: usize,
    rows: Vec<HomeRow>,
    attention: Vec<&'static str>,
    ready: bool,
}

struct Dashboard {
    screen: DashboardScreen,
    greeting: String,
    menu_selection: usize,
    home_data: Option<HomeData>,
    terminal_action: Option<TerminalCommand>,
    pending_review: Option<CategoryKey>,
    status_message: Option<String>,
}

impl Dashboard {
    fn new(user_name: Option<String>) -> Self {
        let mut rng = rand::thread_rng();
        let random_greeting = GREETINGS
            .choose(&mut rng)
            .unwrap_or(&"Hello.")
            .to_string();
        let first_name = user_name
            .as_deref()
            .and_then(|n| n.split_whitespace().next())
            .unwrap_or("");
        let greeting = if first_name.is_empty() {
            format!("klaar: {random_greeting}")
        } else {
            format!("Hello, {first_name}. {random_greeting}")
        };
        Self {
            screen: DashboardScreen::Home,
            greeting,
            menu_selection: 0,
            home_data: None,
            terminal_action: None,
            pending_review: None,
            status_message: None,
        }
    }

    fn load_data(&mut self, store: &Store) {
        let state = store.state();
        let mut done = 0;
        let mut review = 0;
        let mut todo = 0;
        let mut file_count = 0;
        let mut rows = Vec::new();
        for key in CategoryKey::ALL {
            let record = store.record(key);
            match record.status {
                Status::Ok => done += 1,
                Status::Warn => review += 1,
                Status::Todo => todo += 1,
            }
            file_count += record.files.len();
            rows.push(HomeRow {
                key,
                status: record.status,
                files: record.files.len(),
                result: record.data.as_ref().map(|d| calculate(Some(d)).result),
            });
        }
        self.home_data = Some(HomeData {
            year: state.year.clone(),
            pct: progress::completion(state),
            done,
            review,
            todo,
            file_count,
            rows,
            attention: progress::attention(state)
                .into_iter()
                .map(|k| k.label())
                .collect(),
            ready: progress::export_ready(state),
        });
    }

    fn draw(&mut self, frame: &mut Frame, store: &Store) {
        if let DashboardScreen::Review(ref mut reviewer) = self.screen {
            reviewer.draw(frame, store);
            return;
        }
        if let DashboardScreen::CategoryPicker { selection } = self.screen {
            self.draw_category_picker(frame, selection);
            return;
        }
        if matches!(self.screen, DashboardScreen::ConfirmReset) {
            self.draw_confirm_reset(frame);
            return;
        }
        self.draw_home(frame);
    }

    fn draw_home(&self, frame: &mut Frame) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);

        let menu_rows = MENU_ITEMS.len() as u16 + 1;

        let [header_area, sep1, stats_area, sep2, chart_area, sep3, menu_area, hints_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(7),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(menu_rows),
                Constraint::Length(1),
            ])
            .areas(area);

        // Header
        frame.render_widget(
            Paragraph::new(format!(" {}", self.greeting)).style(HEADER_STYLE),
            header_area,
        );

        // Thick separator lines
        let sep_line = "━".repeat(area.width as usize);
        let sep_widget = Paragraph::new(sep_line.as_str()).style(border_style);
        frame.render_widget(sep_widget.clone(), sep1);
        frame.render_widget(sep_widget.clone(), sep2);
        frame.render_widget(sep_widget.clone(), sep3);

        if let Some(data) = &self.home_data {
            // Progress + category table, same 50/50 split as the chart below
            let [left_area, right_area] =
                Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .areas(stats_area);

            let [year_line, gauge_line, counts_area] = Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(left_area);

            frame.render_widget(
                Paragraph::new(format!(" {:<15}{}", "Filing year", data.year)),
                year_line,
            );

            // 1-space indent to line up with the rows around it
            let [_, gauge_area] =
                Layout::horizontal([Constraint::Length(1), Constraint::Fill(1)]).areas(gauge_line);
            let gauge = LineGauge::default()
                .ratio(f64::from(data.pct) / 100.0)
                .filled_style(Style::new().fg(Color::Rgb(80, 220, 100)))
                .unfilled_style(FOOTER_STYLE)
                .label(format!("{:<12}{:>3}%", "Completion", data.pct));
            frame.render_widget(gauge, gauge_area);

            let ready_line = if data.ready {
                Line::from(Span::styled(
                    " Export ready.",
                    Style::new().fg(Color::Rgb(80, 220, 100)),
                ))
            } else {
                Line::from(Span::styled(
                    format!(
                        " Export unlocks at {}% with a document attached (now {}%).",
                        EXPORT_THRESHOLD, data.pct
                    ),
                    FOOTER_STYLE,
                ))
            };
            let counts_lines = vec![
                Line::from(format!(" {:<15}{}", "Done", data.done)),
                Line::from(format!(" {:<15}{}", "In review", data.review)),
                Line::from(format!(" {:<15}{}", "To do", data.todo)),
                Line::from(format!(" {:<15}{}", "Documents", data.file_count)),
                ready_line,
            ];
            frame.render_widget(Paragraph::new(counts_lines), counts_area);

            // Category rows with status pills, file counts and results
            let mut category_lines = vec![Line::from(Span::styled(
                " Categories",
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            for row in &data.rows {
                let mut spans = vec![
                    Span::raw(format!(" {:<21}", row.key.label())),
                    Span::styled(format!("{:<8}", row.status.label()), status_style(row.status)),
                    Span::raw(format!("{:>2}  ", row.files)),
                ];
                match row.result {
                    Some(v) => spans.push(money_span(v)),
                    None => spans.push(Span::styled("\u{2014}", FOOTER_STYLE)),
                }
                category_lines.push(Line::from(spans));
            }
            if data.attention.is_empty() {
                category_lines.push(Line::from(Span::styled(
                    " Nothing needs attention.",
                    FOOTER_STYLE,
                )));
            } else {
                category_lines.push(Line::from(Span::styled(
                    format!(" Next: {}", data.attention.join(", ")),
                    Style::new().fg(Color::Yellow),
                )));
            }
            frame.render_widget(Paragraph::new(category_lines), right_area);

            // Result bars, one per category with figures
            let bars: Vec<Bar> = data
                .rows
                .iter()
                .filter_map(|row| row.result.map(|v| (row.key, v)))
                .map(|(key, result)| {
                    let style = if result < 0.0 {
                        AMOUNT_NEG_STYLE
                    } else {
                        AMOUNT_POS_STYLE
                    };
                    Bar::default()
                        .value(result.abs().round() as u64)
                        .label(Line::from(key.short_label()))
                        .text_value(money(result))
                        .style(style)
                })
                .collect();

            if bars.is_empty() {
                let lines = vec![
                    Line::from(Span::styled(
                        " Results by category",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        "   nothing to chart yet",
                        FOOTER_STYLE,
                    )),
                ];
                frame.render_widget(Paragraph::new(lines), chart_area);
            } else {
                let block = Block::default()
                    .title("Results by category")
                    .title_style(Style::default().add_modifier(Modifier::BOLD))
                    .borders(Borders::NONE);
                let chart = BarChart::default()
                    .block(block)
                    .bar_width(9)
                    .bar_gap(2)
                    .data(BarGroup::default().bars(&bars));
                frame.render_widget(chart, chart_area);
            }
        }

        // Command menu
        let [menu_title_area, menu_items_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(menu_area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                " What would you like to do?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            menu_title_area,
        );

        let menu_lines: Vec<Line> = (0..MENU_ITEMS.len())
            .map(|i| self.menu_item_line(i))
            .collect();
        frame.render_widget(Paragraph::new(menu_lines), menu_items_area);

        // Hints / status message
        if let Some(msg) = &self.status_message {
            frame.render_widget(
                Paragraph::new(format!(" {msg}")).style(Style::default().fg(Color::Yellow)),
                hints_area,
            );
        } else {
            frame.render_widget(
                Paragraph::new(" Up/Down=navigate  Enter=select  r=refresh  q=quit")
                    .style(FOOTER_STYLE),
                hints_area,
            );
        }
    }

    fn draw_category_picker(&self, frame: &mut Frame, selection: usize) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);

        let [header_area, sep, content_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" {}", self.greeting)).style(HEADER_STYLE),
            header_area,
        );

        let sep_line = "━".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(sep_line.as_str()).style(border_style), sep);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                " Open a category to review",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (i, key) in CategoryKey::ALL.into_iter().enumerate() {
            let marker = if i == selection { ">" } else { " " };
            let name_style = if i == selection {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let status = self
                .home_data
                .as_ref()
                .and_then(|d| d.rows.get(i).map(|r| r.status))
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(format!(" {marker} {:<21}", key.label()), name_style),
                Span::styled(status.label().to_string(), status_style(status)),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), content_area);

        frame.render_widget(
            Paragraph::new(" Up/Down=navigate  Enter=open  Esc=back  q=quit").style(FOOTER_STYLE),
            hints_area,
        );
    }

    fn draw_confirm_reset(&self, frame: &mut Frame) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);

        let [header_area, sep, content_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" {}", self.greeting)).style(HEADER_STYLE),
            header_area,
        );

        let sep_line = "━".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(sep_line.as_str()).style(border_style), sep);

        let year = self
            .home_data
            .as_ref()
            .map(|d| d.year.clone())
            .unwrap_or_default();
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                " Reset the checklist?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!(" This clears every status, figure and document list for {year}."),
                FOOTER_STYLE,
            )),
            Line::from(Span::styled(
                " Settings and the data directory stay.",
                FOOTER_STYLE,
            )),
        ];
        frame.render_widget(Paragraph::new(lines), content_area);

        frame.render_widget(
            Paragraph::new(" y=reset  n=back").style(FOOTER_STYLE),
            hints_area,
        );
    }

    fn menu_item_line(&self, i: usize) -> Line<'static> {
        let marker = if i == self.menu_selection { ">" } else { " " };
        let style = if i == self.menu_selection {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(Span::styled(format!(" {marker} {}", MENU_ITEMS[i]), style))
    }

    fn handle_home_key(&mut self, code: KeyCode, store: &mut Store) -> bool {
        self.status_message = None;
        match code {
            KeyCode::Up => {
                self.menu_selection = self.menu_selection.saturating_sub(1);
            }
            KeyCode::Down => {
                self.menu_selection = (self.menu_selection + 1).min(MENU_ITEMS.len() - 1);
            }
            KeyCode::Char('q') => return true,
            KeyCode::Enter => match self.menu_selection {
                0 => self.screen = DashboardScreen::CategoryPicker { selection: 0 },
                1 => self.terminal_action = Some(TerminalCommand::Attach),
                2 => {
                    super::demo::load_all(store);
                    self.load_data(store);
                    self.status_message =
                        Some("Example data loaded into every category.".to_string());
                }
                3 => self.terminal_action = Some(TerminalCommand::Year),
                4 => self.terminal_action = Some(TerminalCommand::Export),
                5 => self.screen = DashboardScreen::ConfirmReset,
                _ => {}
            },
            _ => {}
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Terminal-mode helpers
// ---------------------------------------------------------------------------

fn prompt(label: &str) -> String {
    print!("{label}");
    let _ = std::io::stdout().flush();
    let mut input = String::new();
    let _ = std::io::stdin().read_line(&mut input);
    input.trim().to_string()
}

fn wait_for_enter() {
    println!("\nPress Enter to return to the dashboard...");
    let _ = std::io::stdin().read_line(&mut String::new());
}

fn run_terminal_command(cmd: TerminalCommand) {
    let result = match cmd {
        TerminalCommand::Attach => run_attach(),
        TerminalCommand::Year => run_set_year(),
        TerminalCommand::Export => super::export::run(None, false),
    };
    if let Err(e) = result {
        eprintln!("\nError: {e}");
    }
    wait_for_enter();
}

fn run_attach() -> Result<()> {
    println!("Categories:");
    for (i, key) in CategoryKey::ALL.into_iter().enumerate() {
        println!("  {}) {}", i + 1, key.label());
    }
    let choice = prompt("Select category number: ");
    let idx: usize = choice.parse().unwrap_or(0);
    if idx == 0 || idx > CategoryKey::ALL.len() {
        println!("Invalid selection.");
        return Ok(());
    }

    let path = prompt("Document path: ");
    if path.is_empty() {
        return Ok(());
    }

    super::files::attach(CategoryKey::ALL[idx - 1], &[path])
}

fn run_set_year() -> Result<()> {
    let year = prompt("Filing year (YYYY): ");
    if year.is_empty() {
        return Ok(());
    }
    match super::parse_year(&year) {
        Ok(y) => super::year::run(&y),
        Err(e) => {
            println!("{e}");
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

pub fn run() -> Result<()> {
    // First run: seed settings so the data dir is stable from the start
    if !settings_file_exists() {
        save_settings(&Settings::default())?;
    }

    let settings = load_settings();
    let data_dir = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&data_dir)?;
    std::fs::create_dir_all(data_dir.join("exports"))?;

    let user_name = if settings.user_name.is_empty() {
        None
    } else {
        Some(settings.user_name.clone())
    };

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    loop {
        let mut store = super::open_store();
        let mut dashboard = Dashboard::new(user_name.clone());
        dashboard.load_data(&store);

        let mut terminal = ratatui::init();

        let exit: std::result::Result<Option<TerminalCommand>, crate::error::KlaarError> = loop {
            if let Err(e) = terminal.draw(|frame| dashboard.draw(frame, &store)) {
                break Err(e.into());
            }

            match event::read() {
                Err(e) => break Err(e.into()),
                Ok(Event::Key(key)) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break Ok(None);
                    }

                    let mut return_home = false;
                    let should_quit = match &mut dashboard.screen {
                        DashboardScreen::Home => {
                            if key.code == KeyCode::Char('r') {
                                store = super::open_store();
                                dashboard.load_data(&store);
                                false
                            } else {
                                dashboard.handle_home_key(key.code, &mut store)
                            }
                        }
                        DashboardScreen::CategoryPicker { selection } => {
                            match key.code {
                                KeyCode::Up => *selection = selection.saturating_sub(1),
                                KeyCode::Down => {
                                    *selection = (*selection + 1).min(CategoryKey::ALL.len() - 1)
                                }
                                KeyCode::Esc => return_home = true,
                                KeyCode::Enter => {
                                    dashboard.pending_review = Some(CategoryKey::ALL[*selection]);
                                }
                                _ => {}
                            }
                            key.code == KeyCode::Char('q')
                        }
                        DashboardScreen::Review(reviewer) => {
                            match reviewer.handle_key(key.code, &mut store) {
                                ViewAction::Close => return_home = true,
                                ViewAction::Continue => {}
                            }
                            false
                        }
                        DashboardScreen::ConfirmReset => {
                            match key.code {
                                KeyCode::Char('y') => {
                                    match store.reset() {
                                        Ok(()) => {
                                            dashboard.status_message =
                                                Some("Checklist reset.".to_string());
                                        }
                                        Err(e) => {
                                            dashboard.status_message =
                                                Some(format!("Reset failed: {e}"));
                                        }
                                    }
                                    return_home = true;
                                }
                                KeyCode::Char('n') | KeyCode::Esc => return_home = true,
                                _ => {}
                            }
                            false
                        }
                    };

                    if return_home {
                        dashboard.screen = DashboardScreen::Home;
                        dashboard.load_data(&store);
                    }

                    if let Some(category) = dashboard.pending_review.take() {
                        dashboard.screen =
                            DashboardScreen::Review(CategoryReviewer::new(category, &store));
                    }

                    if let Some(cmd) = dashboard.terminal_action.take() {
                        break Ok(Some(cmd));
                    }

                    if should_quit {
                        break Ok(None);
                    }
                }
                _ => {}
            }
        };

        drop(terminal);
        ratatui::restore();

        match exit {
            Err(e) => return Err(e),
            Ok(None) => return Ok(()),
            Ok(Some(cmd)) => {
                run_terminal_command(cmd);
            }
        }
    }
}
