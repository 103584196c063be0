//! 测验卡片配色

use quizhub_shared::QuizId;

const PALETTE: [&str; 6] = [
    "bg-primary text-primary-content",
    "bg-secondary text-secondary-content",
    "bg-accent text-accent-content",
    "bg-info text-info-content",
    "bg-success text-success-content",
    "bg-warning text-warning-content",
];

/// 按测验 id 取色，同一测验在任何时候都得到相同的颜色
pub fn card_color(id: QuizId) -> &'static str {
    let index = id.rem_euclid(PALETTE.len() as i64) as usize;
    PALETTE[index]
}
