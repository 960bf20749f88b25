use crate::models::{AppState, CategoryKey, Status};

/// Completion percentage at which the export unlocks.
pub const EXPORT_THRESHOLD: u8 = 80;

/// Weighted checklist completion in whole percent. Finished categories
/// count fully, categories under review count half.
pub fn completion(state: &AppState) -> u8 {
    let mut score = 0.0;
    for record in state.categories.values() {
        score += match record.status {
            Status::Ok => 1.0,
            Status::Warn => 0.5,
            Status::Todo => 0.0,
        };
    }
    ((score / state.categories.len() as f64) * 100.0).round() as u8
}

/// True when at least one document is attached anywhere.
pub fn has_files(state: &AppState) -> bool {
    state.categories.values().any(|r| !r.files.is_empty())
}

/// The export gate: enough of the checklist done, and at least one piece
/// of evidence on file.
pub fn export_ready(state: &AppState) -> bool {
    completion(state) >= EXPORT_THRESHOLD && has_files(state)
}

/// Categories that still need work, to-do entries first, capped at three.
/// Feeds the dashboard's worry list.
pub fn attention(state: &AppState) -> Vec<CategoryKey> {
    let mut todo = Vec::new();
    let mut warn = Vec::new();
    for (key, record) in &state.categories {
        match record.status {
            Status::Todo => todo.push(*key),
            Status::Warn => warn.push(*key),
            Status::Ok => {}
        }
    }
    todo.extend(warn);
    todo.truncate(3);
    todo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileRef;

    fn state_with(statuses: [Status; 5]) -> AppState {
        let mut state = AppState::default_for_year("2027");
        for (key, status) in CategoryKey::ALL.into_iter().zip(statuses) {
            let record = state.categories.get_mut(&key).unwrap();
            record.status = status;
        }
        state
    }

    #[test]
    fn test_untouched_checklist_scores_zero() {
        let state = AppState::default_for_year("2027");
        assert_eq!(completion(&state), 0);
        assert!(!export_ready(&state));
    }

    #[test]
    fn test_all_done_scores_hundred() {
        let state = state_with([Status::Ok; 5]);
        assert_eq!(completion(&state), 100);
    }

    #[test]
    fn test_three_done_two_review_scores_eighty() {
        let state = state_with([
            Status::Ok,
            Status::Ok,
            Status::Ok,
            Status::Warn,
            Status::Warn,
        ]);
        assert_eq!(completion(&state), 80);
    }

    #[test]
    fn test_single_review_scores_ten() {
        let state = state_with([
            Status::Warn,
            Status::Todo,
            Status::Todo,
            Status::Todo,
            Status::Todo,
        ]);
        assert_eq!(completion(&state), 10);
    }

    #[test]
    fn test_export_needs_a_document_even_at_hundred_percent() {
        let mut state = state_with([Status::Ok; 5]);
        assert_eq!(completion(&state), 100);
        assert!(!export_ready(&state));

        let record = state.categories.get_mut(&CategoryKey::Bank).unwrap();
        record.files.push(FileRef {
            name: "statement.pdf".to_string(),
            size: 1024,
        });
        assert!(export_ready(&state));
    }

    #[test]
    fn test_export_needs_eighty_percent() {
        let mut state = state_with([
            Status::Ok,
            Status::Ok,
            Status::Ok,
            Status::Warn,
            Status::Todo,
        ]);
        let record = state.categories.get_mut(&CategoryKey::Bank).unwrap();
        record.files.push(FileRef {
            name: "statement.pdf".to_string(),
            size: 1024,
        });
        assert_eq!(completion(&state), 70);
        assert!(!export_ready(&state));
    }

    #[test]
    fn test_attention_lists_todo_before_review() {
        let state = state_with([
            Status::Warn, // bank
            Status::Ok,   // investments
            Status::Todo, // real estate
            Status::Ok,   // loans
            Status::Todo, // crypto
        ]);
        assert_eq!(
            attention(&state),
            vec![
                CategoryKey::RealEstate,
                CategoryKey::Crypto,
                CategoryKey::Bank
            ]
        );
    }

    #[test]
    fn test_attention_caps_at_three() {
        let state = AppState::default_for_year("2027");
        assert_eq!(attention(&state).len(), 3);
    }

    #[test]
    fn test_attention_empty_when_everything_done() {
        let state = state_with([Status::Ok; 5]);
        assert!(attention(&state).is_empty());
    }
}
