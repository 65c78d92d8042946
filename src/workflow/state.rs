//! 解析状态机
//!
//! `NotStarted → TryingIdentifier → TryingTitleSearch → TryingFuzzyCatalog → Resolved | Unresolved`
//!
//! 只在策略给出确定结果时迁移，状态不会重复进入。

use crate::models::StrategyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    NotStarted,
    TryingIdentifier,
    TryingTitleSearch,
    TryingFuzzyCatalog,
    Resolved,
    Unresolved,
}

impl ResolutionState {
    /// 执行某个策略时所处的状态
    pub fn trying(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Identifier => ResolutionState::TryingIdentifier,
            StrategyKind::TitleSearch => ResolutionState::TryingTitleSearch,
            StrategyKind::FuzzyCatalog => ResolutionState::TryingFuzzyCatalog,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ResolutionState::Resolved | ResolutionState::Unresolved)
    }

    fn rank(self) -> u8 {
        match self {
            ResolutionState::NotStarted => 0,
            ResolutionState::TryingIdentifier => 1,
            ResolutionState::TryingTitleSearch => 2,
            ResolutionState::TryingFuzzyCatalog => 3,
            ResolutionState::Resolved | ResolutionState::Unresolved => 4,
        }
    }

    /// 迁移只能向前；终态之后不能再迁移
    pub fn can_transition_to(self, next: ResolutionState) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }
}

/// 记录一次解析经过的状态
#[derive(Debug, Clone)]
pub struct StateTrace {
    states: Vec<ResolutionState>,
}

impl StateTrace {
    pub fn new() -> Self {
        Self {
            states: vec![ResolutionState::NotStarted],
        }
    }

    pub fn current(&self) -> ResolutionState {
        self.states
            .last()
            .copied()
            .unwrap_or(ResolutionState::NotStarted)
    }

    /// 非法迁移被忽略并返回 `false`
    pub fn advance(&mut self, next: ResolutionState) -> bool {
        if !self.current().can_transition_to(next) {
            tracing::debug!("忽略非法状态迁移: {:?} → {:?}", self.current(), next);
            return false;
        }
        tracing::debug!("状态迁移: {:?} → {:?}", self.current(), next);
        self.states.push(next);
        true
    }

    pub fn into_states(self) -> Vec<ResolutionState> {
        self.states
    }
}

impl Default for StateTrace {
    fn default() -> Self {
        Self::new()
    }
}
