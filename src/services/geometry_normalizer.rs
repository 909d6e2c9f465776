//! 几何归一化服务 - 业务能力层
//!
//! 把字形路径的命令字符串转换成数值签名（命令计数 + 复杂度 + 近似包围盒）
//!
//! ## 包围盒
//! 只使用路径上的点（移动、直线以及曲线终点），不使用曲线控制点。
//! 这不是几何上精确的包围盒，但对验证码字形的区分已经足够。

use crate::models::{BoundingBox, PathSignature};
use crate::services::signature_cache::{CacheStats, SignatureCache};
use phf::phf_map;
use tracing::trace;

/// 命令类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandClass {
    Curve,
    Line,
    Move,
    Close,
}

/// 路径命令字母表
static COMMAND_CLASSES: phf::Map<char, CommandClass> = phf_map! {
    'C' => CommandClass::Curve, 'c' => CommandClass::Curve,
    'S' => CommandClass::Curve, 's' => CommandClass::Curve,
    'Q' => CommandClass::Curve, 'q' => CommandClass::Curve,
    'T' => CommandClass::Curve, 't' => CommandClass::Curve,
    'A' => CommandClass::Curve, 'a' => CommandClass::Curve,
    'L' => CommandClass::Line, 'l' => CommandClass::Line,
    'H' => CommandClass::Line, 'h' => CommandClass::Line,
    'V' => CommandClass::Line, 'v' => CommandClass::Line,
    'M' => CommandClass::Move, 'm' => CommandClass::Move,
    'Z' => CommandClass::Close, 'z' => CommandClass::Close,
};

/// 查询命令字母所属类别
pub fn command_class(c: char) -> Option<CommandClass> {
    COMMAND_CLASSES.get(&c).copied()
}

/// 每个命令一次消耗的操作数个数
fn operand_arity(cmd: char) -> usize {
    match cmd.to_ascii_uppercase() {
        'M' | 'L' | 'T' => 2,
        'H' | 'V' => 1,
        'S' | 'Q' => 4,
        'C' => 6,
        'A' => 7,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

/// 弧线命令的第 4、5 个操作数是单字符标志位
fn is_arc_flag_slot(current: Option<char>, slot: usize) -> bool {
    matches!(current, Some('A') | Some('a')) && matches!(slot % 7, 3 | 4)
}

/// 路径数据词法分析
///
/// 每次调用都创建新的扫描状态，不在多次解析之间共享。
/// 弧线标志位可以不加分隔符，`a5 5 0 1110 10` 读作 `5 5 0 1 1 10 10`
fn tokenize(d: &str) -> Vec<Token> {
    let bytes = d.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;
    let mut current: Option<char> = None;
    // 当前命令已经读到的操作数个数
    let mut slot = 0usize;

    while i < bytes.len() {
        let c = bytes[i];
        if command_class(c as char).is_some() {
            tokens.push(Token::Command(c as char));
            current = Some(c as char);
            slot = 0;
            i += 1;
        } else if is_arc_flag_slot(current, slot) && (c == b'0' || c == b'1') {
            tokens.push(Token::Number(f64::from(c - b'0')));
            slot += 1;
            i += 1;
        } else if c.is_ascii_digit() || c == b'.' || c == b'-' || c == b'+' {
            match scan_number(bytes, i) {
                Some((value, next)) => {
                    tokens.push(Token::Number(value));
                    slot += 1;
                    i = next;
                }
                None => i += 1,
            }
        } else {
            // 分隔符和字母表以外的字符
            i += 1;
        }
    }

    tokens
}

/// 从 `start` 处读取一个数字，返回数值和下一个位置
///
/// `10-5` 读作两个数字，`0.5.5` 读作 `0.5` 和 `.5`
fn scan_number(bytes: &[u8], start: usize) -> Option<(f64, usize)> {
    let mut i = start;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut had_digits = i > int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        had_digits |= i > frac_start;
    }

    if !had_digits {
        return None;
    }

    // 指数部分只有在后面跟着数字时才生效
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    let text = std::str::from_utf8(&bytes[start..i]).ok()?;
    let value = text.parse::<f64>().ok()?;
    if value.is_finite() {
        Some((value, i))
    } else {
        None
    }
}

/// 按命令类别统计出现次数（与顺序无关）
fn count_commands(d: &str) -> (usize, usize, usize) {
    let mut curves = 0;
    let mut lines = 0;
    let mut moves = 0;
    for c in d.chars() {
        match command_class(c) {
            Some(CommandClass::Curve) => curves += 1,
            Some(CommandClass::Line) => lines += 1,
            Some(CommandClass::Move) => moves += 1,
            _ => {}
        }
    }
    (curves, lines, moves)
}

/// 路径游标，跟踪当前点和子路径起点
#[derive(Debug, Default)]
struct Cursor {
    x: f64,
    y: f64,
    start_x: f64,
    start_y: f64,
    bbox: Option<BoundingBox>,
}

impl Cursor {
    fn move_to(&mut self, x: f64, y: f64, relative: bool) {
        if relative {
            self.x += x;
            self.y += y;
        } else {
            self.x = x;
            self.y = y;
        }
        self.fold();
    }

    fn fold(&mut self) {
        match self.bbox.as_mut() {
            Some(bbox) => bbox.include(self.x, self.y),
            None => self.bbox = Some(BoundingBox::from_point(self.x, self.y)),
        }
    }

    /// 执行一组完整的操作数
    fn apply(&mut self, cmd: char, ops: &[f64]) {
        let relative = cmd.is_ascii_lowercase();
        match cmd.to_ascii_uppercase() {
            'M' => {
                self.move_to(ops[0], ops[1], relative);
                self.start_x = self.x;
                self.start_y = self.y;
            }
            'L' => self.move_to(ops[0], ops[1], relative),
            'H' => {
                self.x = if relative { self.x + ops[0] } else { ops[0] };
                self.fold();
            }
            'V' => {
                self.y = if relative { self.y + ops[0] } else { ops[0] };
                self.fold();
            }
            // 曲线只取终点，控制点不参与包围盒
            'C' | 'S' | 'Q' | 'T' | 'A' => {
                let n = ops.len();
                self.move_to(ops[n - 2], ops[n - 1], relative);
            }
            _ => {}
        }
    }

    fn close(&mut self) {
        self.x = self.start_x;
        self.y = self.start_y;
    }
}

/// 沿命令流计算近似包围盒
fn walk_bbox(tokens: &[Token]) -> BoundingBox {
    let mut cursor = Cursor::default();
    let mut current: Option<char> = None;
    let mut operands: Vec<f64> = Vec::with_capacity(7);

    for token in tokens {
        match *token {
            Token::Command(cmd) => {
                operands.clear();
                if cmd == 'Z' || cmd == 'z' {
                    cursor.close();
                    current = None;
                } else {
                    current = Some(cmd);
                }
            }
            Token::Number(value) => {
                let Some(cmd) = current else {
                    continue;
                };
                operands.push(value);
                if operands.len() == operand_arity(cmd) {
                    cursor.apply(cmd, &operands);
                    operands.clear();
                    // M 之后多余的坐标对按隐式 L 处理
                    if cmd == 'M' {
                        current = Some('L');
                    } else if cmd == 'm' {
                        current = Some('l');
                    }
                }
            }
        }
    }

    cursor.bbox.unwrap_or_default()
}

/// 计算签名（不经过缓存）
///
/// 空字符串或不含任何数字的路径返回全零签名，不会报错
pub fn compute_signature(d: &str) -> PathSignature {
    let tokens = tokenize(d);
    if !tokens.iter().any(|t| matches!(t, Token::Number(_))) {
        return PathSignature::zero();
    }

    let (curves, lines, moves) = count_commands(d);
    let bbox = walk_bbox(&tokens);
    PathSignature::from_counts(curves, lines, moves, bbox)
}

/// 几何归一化服务
///
/// 职责：
/// - 把 `d` 字符串转换为 `PathSignature`
/// - 持有有界签名缓存
/// - 不关心字形还是噪声
#[derive(Debug)]
pub struct GeometryNormalizer {
    cache: SignatureCache,
}

impl GeometryNormalizer {
    /// 创建新的归一化服务
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            cache: SignatureCache::new(cache_capacity),
        }
    }

    /// 计算签名，结果写入缓存
    pub fn signature(&self, d: &str) -> PathSignature {
        self.cache.get_or_insert_with(d, || {
            let sig = compute_signature(d);
            trace!(
                "计算签名: curves={} lines={} moves={} complexity={}",
                sig.curve_count,
                sig.line_count,
                sig.move_count,
                sig.complexity
            );
            sig
        })
    }

    pub fn cache(&self) -> &SignatureCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Complexity;

    #[test]
    fn test_counts_by_command_class() {
        let sig = compute_signature("M0 0 L10 0 C10 5 5 10 0 10 Q-5 5 0 0 Z");
        assert_eq!(sig.curve_count, 2);
        assert_eq!(sig.line_count, 1);
        assert_eq!(sig.move_count, 1);
        assert_eq!(sig.total_commands, 4);
        assert_eq!(sig.complexity, Complexity::Medium);
    }

    #[test]
    fn test_empty_and_non_numeric_yield_zero() {
        assert_eq!(compute_signature(""), PathSignature::zero());
        assert_eq!(compute_signature("   "), PathSignature::zero());
        assert_eq!(compute_signature("abc"), PathSignature::zero());
        assert_eq!(compute_signature("M L Z"), PathSignature::zero());
    }

    #[test]
    fn test_absolute_bbox() {
        let sig = compute_signature("M5 2 L15 2 L15 22 L5 22 Z");
        assert_eq!(sig.bbox, BoundingBox::new(5.0, 2.0, 15.0, 22.0));
        assert_eq!(sig.aspect_ratio(), 0.5);
    }

    #[test]
    fn test_relative_bbox_follows_cursor() {
        let sig = compute_signature("M10 10 l5 0 l0 20 l-5 0 z");
        assert_eq!(sig.bbox, BoundingBox::new(10.0, 10.0, 15.0, 30.0));
    }

    #[test]
    fn test_horizontal_and_vertical_take_single_operand() {
        let sig = compute_signature("M8 0 h4 v30 h-4 v-24 l-3 2 v-4 z");
        assert_eq!(sig.line_count, 6);
        assert_eq!(sig.bbox, BoundingBox::new(5.0, 0.0, 12.0, 30.0));
    }

    #[test]
    fn test_curve_control_points_are_ignored() {
        // 控制点 (50, -40) 远在终点之外，不应该扩大包围盒
        let sig = compute_signature("M0 0 C50 -40 50 -40 10 10");
        assert_eq!(sig.bbox, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(sig.curve_count, 1);
    }

    #[test]
    fn test_implicit_lineto_after_move() {
        let sig = compute_signature("M0 0 10 0 10 20");
        assert_eq!(sig.move_count, 1);
        assert_eq!(sig.line_count, 0);
        assert_eq!(sig.bbox, BoundingBox::new(0.0, 0.0, 10.0, 20.0));
    }

    #[test]
    fn test_close_returns_to_subpath_start() {
        let sig = compute_signature("M10 10 l10 0 z l0 -5");
        assert_eq!(sig.bbox, BoundingBox::new(10.0, 5.0, 20.0, 10.0));
    }

    #[test]
    fn test_arc_flags_without_separators() {
        let sig = compute_signature("M0 0 a5 5 0 1110 10");
        assert_eq!(sig.curve_count, 1);
        assert_eq!(sig.bbox, BoundingBox::new(0.0, 0.0, 10.0, 10.0));

        // 重复的弧线参数组同样按 7 个一组切分
        let sig = compute_signature("M0 0 A5 5 0 0110 10 5 5 0 1020 0");
        assert_eq!(sig.bbox, BoundingBox::new(0.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn test_compact_number_syntax() {
        let sig = compute_signature("M1.5-2L3e1.5.5");
        assert_eq!(sig.bbox, BoundingBox::new(1.5, -2.0, 30.0, 0.5));
    }

    #[test]
    fn test_normalizer_caches_results() {
        let normalizer = GeometryNormalizer::new(4);
        let a = normalizer.signature("M0 0 L1 1");
        let b = normalizer.signature("M0 0 L1 1");
        assert_eq!(a, b);
        assert_eq!(normalizer.cache_stats().hits, 1);
        assert_eq!(normalizer.cache().len(), 1);
    }

    #[test]
    fn test_cache_does_not_change_result() {
        let cached = GeometryNormalizer::new(16);
        let uncached = GeometryNormalizer::new(0);
        let d = "M0 0 c5 0 10 5 10 10 s-5 10 -10 10 z";
        for _ in 0..3 {
            assert_eq!(cached.signature(d), uncached.signature(d));
        }
    }
}
