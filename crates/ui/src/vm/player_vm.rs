use services::AdventureState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerBadgeVm {
    pub name: String,
    pub level_label: String,
    pub xp_label: String,
    pub streak_label: String,
}

/// Badge for the top bar; `None` before the adventure begins.
#[must_use]
pub fn map_player_badge(state: &AdventureState) -> Option<PlayerBadgeVm> {
    let player = state.player()?;
    let xp = state.xp();
    Some(PlayerBadgeVm {
        name: player.name.clone(),
        level_label: format!("Level {}", xp.level()),
        xp_label: format!("{} XP", xp.total_xp()),
        streak_label: format!("Streak {}", state.streak().current()),
    })
}
