use serde::{Deserialize, Serialize};

/// 路径复杂度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Complexity {
    /// 按命令数量判定复杂度
    ///
    /// 阈值按从高到低的顺序判断，命中即返回
    pub fn classify(total_commands: usize, curve_count: usize) -> Self {
        if total_commands >= 15 || curve_count >= 5 {
            Complexity::VeryHigh
        } else if total_commands >= 10 || curve_count >= 3 {
            Complexity::High
        } else if total_commands >= 5 || curve_count >= 1 {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
            Complexity::VeryHigh => "veryHigh",
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 近似包围盒
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// 以单个点初始化
    pub fn from_point(x: f64, y: f64) -> Self {
        Self::new(x, y, x, y)
    }

    /// 把一个点并入包围盒
    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// 宽高比，高度为零时返回 0
    pub fn aspect_ratio(&self) -> f64 {
        let height = self.height();
        if height.abs() < f64::EPSILON {
            0.0
        } else {
            self.width() / height
        }
    }
}

/// 路径的几何特征签名
///
/// 由 `d` 字符串纯函数推导，创建后不可变
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSignature {
    pub curve_count: usize,
    pub line_count: usize,
    pub move_count: usize,
    pub total_commands: usize,
    pub complexity: Complexity,
    pub bbox: BoundingBox,
}

impl PathSignature {
    /// 根据命令计数和包围盒构造签名，总数和复杂度自动推导
    pub fn from_counts(
        curve_count: usize,
        line_count: usize,
        move_count: usize,
        bbox: BoundingBox,
    ) -> Self {
        let total_commands = curve_count + line_count + move_count;
        Self {
            curve_count,
            line_count,
            move_count,
            total_commands,
            complexity: Complexity::classify(total_commands, curve_count),
            bbox,
        }
    }

    /// 空路径的签名
    pub fn zero() -> Self {
        Self::from_counts(0, 0, 0, BoundingBox::default())
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.bbox.aspect_ratio()
    }
}

impl Default for PathSignature {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_thresholds() {
        assert_eq!(Complexity::classify(0, 0), Complexity::Low);
        assert_eq!(Complexity::classify(4, 0), Complexity::Low);
        assert_eq!(Complexity::classify(5, 0), Complexity::Medium);
        assert_eq!(Complexity::classify(2, 1), Complexity::Medium);
        assert_eq!(Complexity::classify(10, 0), Complexity::High);
        assert_eq!(Complexity::classify(3, 3), Complexity::High);
        assert_eq!(Complexity::classify(15, 0), Complexity::VeryHigh);
        assert_eq!(Complexity::classify(6, 5), Complexity::VeryHigh);
    }

    #[test]
    fn test_aspect_ratio_guards_zero_height() {
        assert_eq!(BoundingBox::new(0.0, 5.0, 10.0, 5.0).aspect_ratio(), 0.0);
        assert_eq!(BoundingBox::new(0.0, 0.0, 15.0, 30.0).aspect_ratio(), 0.5);
    }

    #[test]
    fn test_zero_signature() {
        let sig = PathSignature::zero();
        assert_eq!(sig.total_commands, 0);
        assert_eq!(sig.complexity, Complexity::Low);
        assert_eq!(sig.bbox, BoundingBox::default());
    }
}
