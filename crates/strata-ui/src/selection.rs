//! Clip selection rules.

use strata_timeline::ClipId;

/// Selection after clicking `id`. A plain click selects only `id`; a toggle
/// click (Shift) adds or removes it.
pub fn click(current: &[ClipId], id: &ClipId, toggle: bool) -> Vec<ClipId> {
    if !toggle {
        return vec![id.clone()];
    }
    if current.contains(id) {
        current.iter().filter(|c| *c != id).cloned().collect()
    } else {
        let mut next = current.to_vec();
        next.push(id.clone());
        next
    }
}

/// Every clip id in list order.
pub fn select_all<'a>(ids: impl IntoIterator<Item = &'a ClipId>) -> Vec<ClipId> {
    ids.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<ClipId> {
        ["a", "b", "c"].into_iter().map(ClipId::from).collect()
    }

    #[test]
    fn test_plain_click_replaces() {
        let current = ids();
        assert_eq!(click(&current, &current[1], false), vec![current[1].clone()]);
    }

    #[test]
    fn test_toggle_click_adds_and_removes() {
        let all = ids();
        let one = vec![all[0].clone()];
        let two = click(&one, &all[2], true);
        assert_eq!(two, vec![all[0].clone(), all[2].clone()]);
        assert_eq!(click(&two, &all[0], true), vec![all[2].clone()]);
    }

    #[test]
    fn test_select_all_keeps_order() {
        let all = ids();
        assert_eq!(select_all(all.iter()), all);
    }
}
