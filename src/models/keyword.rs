use serde::{Deserialize, Serialize};

/// 竞争程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
    VeryHigh,
    Unknown,
}

impl CompetitionLevel {
    /// 按难度分数推导竞争程度
    pub fn from_difficulty(difficulty: u8) -> Self {
        match difficulty {
            0..=24 => CompetitionLevel::Low,
            25..=49 => CompetitionLevel::Medium,
            50..=74 => CompetitionLevel::High,
            _ => CompetitionLevel::VeryHigh,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompetitionLevel::Low => "low",
            CompetitionLevel::Medium => "medium",
            CompetitionLevel::High => "high",
            CompetitionLevel::VeryHigh => "very_high",
            CompetitionLevel::Unknown => "unknown",
        }
    }
}

/// 流量等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLevel {
    VeryLow,
    Low,
    Medium,
    High,
    Unknown,
}

impl TrafficLevel {
    /// 按流量分数推导流量等级
    pub fn from_traffic(traffic: u8) -> Self {
        match traffic {
            0..=19 => TrafficLevel::VeryLow,
            20..=44 => TrafficLevel::Low,
            45..=69 => TrafficLevel::Medium,
            _ => TrafficLevel::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrafficLevel::VeryLow => "very_low",
            TrafficLevel::Low => "low",
            TrafficLevel::Medium => "medium",
            TrafficLevel::High => "high",
            TrafficLevel::Unknown => "unknown",
        }
    }
}

/// 关键词建议
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Excellent,
    Good,
    Moderate,
    Difficult,
    Avoid,
    AnalysisFailed,
}

impl Recommendation {
    /// 根据流量与难度给出建议
    ///
    /// 高流量低难度最优，低流量高难度应避开
    pub fn from_scores(traffic: u8, difficulty: u8) -> Self {
        if traffic >= 60 && difficulty < 40 {
            Recommendation::Excellent
        } else if traffic >= 40 && difficulty < 60 {
            Recommendation::Good
        } else if traffic >= 60 {
            Recommendation::Difficult
        } else if traffic >= 20 && difficulty < 70 {
            Recommendation::Moderate
        } else {
            Recommendation::Avoid
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Recommendation::Excellent => "excellent",
            Recommendation::Good => "good",
            Recommendation::Moderate => "moderate",
            Recommendation::Difficult => "difficult",
            Recommendation::Avoid => "avoid",
            Recommendation::AnalysisFailed => "analysis_failed",
        }
    }
}

/// ASO 评分服务返回的单个关键词评分（已校验）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordScore {
    pub traffic_score: u8,
    pub difficulty_score: u8,
    pub competition_level: CompetitionLevel,
    pub traffic_level: TrafficLevel,
    pub recommendation: Recommendation,
}

impl KeywordScore {
    /// 只有分数时，由分数推导各项等级
    pub fn from_scores(traffic_score: u8, difficulty_score: u8) -> Self {
        Self {
            traffic_score,
            difficulty_score,
            competition_level: CompetitionLevel::from_difficulty(difficulty_score),
            traffic_level: TrafficLevel::from_traffic(traffic_score),
            recommendation: Recommendation::from_scores(traffic_score, difficulty_score),
        }
    }
}

/// 单个关键词的分析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordResult {
    pub keyword: String,
    pub traffic_score: u8,
    pub difficulty_score: u8,
    pub competition_level: CompetitionLevel,
    pub traffic_level: TrafficLevel,
    pub recommendation: Recommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KeywordResult {
    /// 分析成功的结果
    pub fn scored(keyword: impl Into<String>, score: KeywordScore) -> Self {
        Self {
            keyword: keyword.into(),
            traffic_score: score.traffic_score,
            difficulty_score: score.difficulty_score,
            competition_level: score.competition_level,
            traffic_level: score.traffic_level,
            recommendation: score.recommendation,
            error: None,
        }
    }

    /// 分析失败的降级结果：分数为 0，等级 unknown
    pub fn failed(keyword: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            traffic_score: 0,
            difficulty_score: 0,
            competition_level: CompetitionLevel::Unknown,
            traffic_level: TrafficLevel::Unknown,
            recommendation: Recommendation::AnalysisFailed,
            error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
