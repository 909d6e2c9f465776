//! 内置字形字符表
//!
//! 每个字符一条标准轮廓，由 `M` 绝对坐标起笔、其余命令使用相对坐标，
//! 因此字形在画布上平移不会改变签名。
//!
//! 轮廓按 20x30 左右的字框绘制，同一命令计数组内依靠宽度（宽高比）区分。
//! 换用其它来源的验证码时需要重新采集样本，参见 `services::catalog_loader::load_reference_model`。

/// 内置字符表：(字符, 标准轮廓)
///
/// 注册顺序即匹配时的优先顺序
pub const BUILTIN_GLYPHS: &[(char, &str)] = &[
    ('0', "M10 0 c6 0 10 7 10 15 c0 8 -4 15 -10 15 c-6 0 -10 -7 -10 -15 c0 -8 4 -15 10 -15 z m0 5 c-3 0 -5 4 -5 10 c0 6 2 10 5 10 c3 0 5 -4 5 -10 c0 -6 -2 -10 -5 -10 z"),
    ('1', "M8 0 h4 v30 h-4 v-24 l-3 2 v-4 z"),
    ('2', "M1 6 c1 -4 4 -6 9 -6 c6 0 9 3 9 8 c0 4 -3 7 -7 11 l-6 7 h13 v4 h-19 v-3 l9 -9 c3 -3 5 -6 5 -9 c0 -3 -2 -5 -5 -5 c-3 0 -5 2 -6 4 z"),
    ('3', "M1 4 c2 -3 5 -4 9 -4 c5 0 9 3 9 7 c0 3 -2 6 -5 7 c4 1 6 4 6 8 c0 5 -4 8 -10 8 c-4 0 -8 -2 -10 -5 l3 -3 c2 2 4 4 7 4 c3 0 6 -2 6 -5 c0 -3 -3 -5 -7 -5 h-2 v-4 h2 c3 0 6 -2 6 -4 c0 -3 -2 -4 -5 -4 c-2 0 -4 1 -6 3 z"),
    ('4', "M13 0 h5 v19 h3 v4 h-3 v7 h-4 v-7 h-13 v-4 z m1 6 l-9 13 h9 z"),
    ('5', "M3 0 h15 v4 h-11 l-1 7 c1 -1 3 -1 5 -1 c5 0 9 4 9 10 c0 6 -4 11 -10 11 c-4 0 -7 -2 -9 -5 l3 -3 c1 2 3 4 6 4 c3 0 6 -3 6 -7 c0 -4 -3 -6 -6 -6 c-2 0 -4 1 -5 2 h-3 z"),
    ('6', "M15 0 c-9 2 -15 9 -15 18 c0 7 4 12 10 12 c6 0 10 -5 10 -10 c0 -6 -4 -9 -9 -9 c-2 0 -4 1 -5 2 c1 -5 5 -8 10 -9 z m-5 14 c3 0 5 2 5 5 c0 3 -2 6 -5 6 c-3 0 -5 -3 -5 -6 c0 -3 2 -5 5 -5 z"),
    ('7', "M0 0 h18 v4 l-10 26 h-4 l9 -26 h-13 z"),
    ('8', "M10 0 c5 0 8 3 8 7 c0 3 -2 5 -4 6 c3 1 6 4 6 8 c0 5 -4 9 -10 9 c-6 0 -10 -4 -10 -9 c0 -4 3 -7 6 -8 c-2 -1 -4 -3 -4 -6 c0 -4 3 -7 8 -7 z m0 4 c-2 0 -4 1 -4 3 c0 2 2 4 4 4 c2 0 4 -2 4 -4 c0 -2 -2 -3 -4 -3 z m0 11 c-3 0 -5 2 -5 5 c0 3 2 5 5 5 c3 0 5 -2 5 -5 c0 -3 -2 -5 -5 -5 z"),
    ('9', "M4 30 c8 -2 14 -9 14 -18 c0 -7 -4 -12 -9 -12 c-6 0 -9 5 -9 10 c0 6 4 9 8 9 c2 0 4 -1 5 -2 l-9 11 z m5 -14 c-3 0 -5 -2 -5 -5 c0 -3 2 -6 5 -6 c3 0 5 3 5 6 c0 3 -2 5 -5 5 z"),
    ('A', "M10 0 h4 l10 30 h-4 l-3 -8 h-10 l-3 8 h-4 z m-1 16 h6 l-3 -10 z"),
    ('B', "M0 0 h10 c5 0 8 3 8 7 c0 3 -2 5 -4 6 c3 1 5 4 5 8 c0 5 -4 9 -9 9 h-10 z m4 4 v9 h6 c2 0 4 -2 4 -4 c0 -3 -2 -5 -4 -5 z m0 13 v9 h6 c3 0 5 -2 5 -4 c0 -3 -2 -5 -5 -5 z"),
    ('C', "M20 4 c-2 -3 -5 -4 -8 -4 c-7 0 -12 6 -12 15 c0 9 5 15 12 15 c3 0 6 -1 8 -4 l-3 -3 c-1 2 -3 3 -5 3 c-5 0 -8 -5 -8 -11 c0 -6 3 -11 8 -11 c2 0 4 1 5 3 z"),
    ('D', "M0 0 h8 c8 0 13 6 13 15 c0 9 -5 15 -13 15 h-8 z m4 4 v22 h4 c5 0 9 -4 9 -11 c0 -7 -4 -11 -9 -11 z"),
    ('E', "M0 0 h16 v4 h-12 v9 h10 v4 h-10 v9 h12 v4 h-16 z"),
    ('F', "M0 0 h16 v4 h-12 v9 h10 v4 h-10 v13 h-4 z"),
    ('H', "M0 0 h4 v13 h12 v-13 h4 v30 h-4 v-13 h-12 v13 h-4 z"),
    ('K', "M0 0 h4 v13 l10 -13 h4 l-10 13 l10 17 h-4 l-9 -14 l-1 2 v12 h-4 z"),
    ('M', "M0 0 h5 l7 20 l7 -20 h5 v30 h-4 v-22 l-6 18 h-4 l-6 -18 v22 h-4 z"),
    ('N', "M0 0 h4 l12 22 v-22 h4 v30 h-4 l-12 -22 v22 h-4 z"),
    ('P', "M0 0 h10 c5 0 9 3 9 9 c0 6 -4 9 -9 9 h-6 v12 h-4 z m4 4 v10 h6 c3 0 5 -2 5 -5 c0 -3 -2 -5 -5 -5 z"),
    ('R', "M0 0 h10 c5 0 9 3 9 9 c0 4 -2 7 -6 8 l7 13 h-5 l-6 -12 h-5 v12 h-4 z m4 4 v10 h6 c3 0 5 -2 5 -5 c0 -3 -2 -5 -5 -5 z"),
    ('S', "M18 5 c-2 -3 -5 -5 -9 -5 c-5 0 -8 3 -8 8 c0 4 3 6 8 8 c3 1 5 2 5 5 c0 3 -2 5 -5 5 c-3 0 -5 -1 -7 -4 l-3 3 c2 3 6 5 10 5 c6 0 9 -4 9 -9 c0 -4 -3 -7 -8 -8 c-3 -1 -5 -2 -5 -5 c0 -2 2 -4 4 -4 c3 0 4 1 6 3 z"),
    ('T', "M0 0 h22 v4 h-9 v26 h-4 v-26 h-9 z"),
    ('U', "M0 0 h4 v20 c0 4 2 6 6 6 c4 0 6 -2 6 -6 v-20 h4 v20 c0 6 -4 10 -10 10 c-6 0 -10 -4 -10 -10 z"),
    ('V', "M0 0 h4 l8 24 l8 -24 h4 l-10 30 h-4 z"),
    ('W', "M0 0 h4 l4 22 l5 -22 h4 l5 22 l4 -22 h4 l-6 30 h-4 l-5 -21 l-5 21 h-4 z"),
    ('X', "M0 0 h5 l6 11 l7 -11 h5 l-9 15 l9 15 h-5 l-7 -11 l-6 11 h-5 l8 -15 z"),
    ('Y', "M0 0 h5 l6 12 l6 -12 h5 l-9 17 v13 h-4 v-13 z"),
    ('Z', "M1 0 h21 v4 l-16 22 h16 v4 h-22 v-4 l16 -22 h-15 z"),
];

/// 查询字符的标准轮廓
pub fn builtin_sample(character: char) -> Option<&'static str> {
    BUILTIN_GLYPHS
        .iter()
        .find(|(c, _)| *c == character)
        .map(|(_, d)| *d)
}
