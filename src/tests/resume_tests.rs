use super::*;
use crate::session_data::ThoughtEntry;
use crate::test_support::{complete_data, data_with};
use proptest::prelude::*;

#[test]
fn test_none_and_empty_resume_at_situation() {
    let expected = Resumption {
        start: FlowPosition::Step(CbtStepId::Situation),
        completed: BTreeSet::new(),
    };
    assert_eq!(resolve_resumption(None), expected);
    assert_eq!(
        resolve_resumption(Some(&CbtSessionData::default())),
        expected
    );
}

#[test]
fn test_resumes_after_contiguous_prefix() {
    let data = data_with(&[CbtStepId::Situation, CbtStepId::Emotions]);
    let resumption = resolve_resumption(Some(&data));

    assert_eq!(resumption.start, FlowPosition::Step(CbtStepId::Thoughts));
    assert_eq!(
        resumption.completed.into_iter().collect::<Vec<_>>(),
        vec![CbtStepId::Situation, CbtStepId::Emotions]
    );
}

#[test]
fn test_gap_stops_resolution() {
    // situation filled, emotions missing, thoughts filled
    let data = data_with(&[CbtStepId::Situation, CbtStepId::Thoughts]);
    let resumption = resolve_resumption(Some(&data));

    assert_eq!(resumption.start, FlowPosition::Step(CbtStepId::Emotions));
    assert!(resumption.completed.contains(&CbtStepId::Situation));
    assert!(!resumption.completed.contains(&CbtStepId::Thoughts));
    assert_eq!(resumption.completed.len(), 1);
}

#[test]
fn test_empty_list_counts_as_gap() {
    let mut data = data_with(&[
        CbtStepId::Situation,
        CbtStepId::Emotions,
        CbtStepId::CoreBelief,
    ]);
    data.thoughts = Some(Vec::<ThoughtEntry>::new());

    let resumption = resolve_resumption(Some(&data));
    assert_eq!(resumption.start, FlowPosition::Step(CbtStepId::Thoughts));
    assert_eq!(resumption.completed.len(), 2);
}

#[test]
fn test_all_filled_resumes_at_complete() {
    let data = complete_data();
    let resumption = resolve_resumption(Some(&data));

    assert_eq!(resumption.start, FlowPosition::Complete);
    assert_eq!(resumption.completed.len(), 9);
}

proptest! {
    /// For any fill pattern, the start is the first gap and nothing at or
    /// after it is credited.
    #[test]
    fn prop_first_gap_wins(mask in proptest::collection::vec(any::<bool>(), 9)) {
        let steps: Vec<CbtStepId> = CbtStepId::ALL
            .iter()
            .zip(mask.iter())
            .filter(|(_, filled)| **filled)
            .map(|(step, _)| *step)
            .collect();
        let data = data_with(&steps);
        let resumption = resolve_resumption(Some(&data));

        let first_gap = mask.iter().position(|filled| !filled);
        match first_gap {
            Some(gap) => {
                let gap_step = CbtStepId::ALL[gap];
                prop_assert_eq!(resumption.start, FlowPosition::Step(gap_step));
                prop_assert_eq!(resumption.completed.len(), gap);
                prop_assert!(resumption.completed.iter().all(|s| s.order() < gap));
            }
            None => {
                prop_assert_eq!(resumption.start, FlowPosition::Complete);
                prop_assert_eq!(resumption.completed.len(), 9);
            }
        }
    }
}
