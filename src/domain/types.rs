// ==========================================
// 奶牛场管理系统 - 领域类型定义
// ==========================================
// 红线: 封闭枚举，穷举匹配代替“值 ∈ 允许列表”的字符串校验
// 存储格式: 数据库 TEXT 列存 as_str() 的规范值
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 性别 (Sex)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Sex::Male),
            "Female" => Some(Sex::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 奶牛品种 (Cow Breed)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CowBreedName {
    Friesian,
    Ayrshire,
    Sahiwal,
    Jersey,
    Guernsey,
    Crossbreed,
}

impl CowBreedName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CowBreedName::Friesian => "Friesian",
            CowBreedName::Ayrshire => "Ayrshire",
            CowBreedName::Sahiwal => "Sahiwal",
            CowBreedName::Jersey => "Jersey",
            CowBreedName::Guernsey => "Guernsey",
            CowBreedName::Crossbreed => "Crossbreed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Friesian" => Some(CowBreedName::Friesian),
            "Ayrshire" => Some(CowBreedName::Ayrshire),
            "Sahiwal" => Some(CowBreedName::Sahiwal),
            "Jersey" => Some(CowBreedName::Jersey),
            "Guernsey" => Some(CowBreedName::Guernsey),
            "Crossbreed" => Some(CowBreedName::Crossbreed),
            _ => None,
        }
    }
}

impl fmt::Display for CowBreedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 在场状态 (Availability Status)
// ==========================================
// 说明: Quarantined 由隔离反应器写入，不由客户端直接提交
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CowAvailabilityStatus {
    Alive,
    Sold,
    Dead,
    Quarantined,
}

impl CowAvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CowAvailabilityStatus::Alive => "Alive",
            CowAvailabilityStatus::Sold => "Sold",
            CowAvailabilityStatus::Dead => "Dead",
            CowAvailabilityStatus::Quarantined => "Quarantined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Alive" => Some(CowAvailabilityStatus::Alive),
            "Sold" => Some(CowAvailabilityStatus::Sold),
            "Dead" => Some(CowAvailabilityStatus::Dead),
            "Quarantined" => Some(CowAvailabilityStatus::Quarantined),
            _ => None,
        }
    }
}

impl fmt::Display for CowAvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 妊娠状态 (Pregnancy Status, 牛维度)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CowPregnancyStatus {
    Open,
    Pregnant,
    Calved,
    Unavailable,
}

impl CowPregnancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CowPregnancyStatus::Open => "Open",
            CowPregnancyStatus::Pregnant => "Pregnant",
            CowPregnancyStatus::Calved => "Calved",
            CowPregnancyStatus::Unavailable => "Unavailable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Open" => Some(CowPregnancyStatus::Open),
            "Pregnant" => Some(CowPregnancyStatus::Pregnant),
            "Calved" => Some(CowPregnancyStatus::Calved),
            "Unavailable" => Some(CowPregnancyStatus::Unavailable),
            _ => None,
        }
    }
}

impl fmt::Display for CowPregnancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 生产状态 (Production Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CowProductionStatus {
    Open,
    PregnantNotLactating,
    Lactating,
    Dry,
    Culled,
}

impl CowProductionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CowProductionStatus::Open => "Open",
            CowProductionStatus::PregnantNotLactating => "Pregnant not Lactating",
            CowProductionStatus::Lactating => "Lactating",
            CowProductionStatus::Dry => "Dry",
            CowProductionStatus::Culled => "Culled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Open" => Some(CowProductionStatus::Open),
            "Pregnant not Lactating" => Some(CowProductionStatus::PregnantNotLactating),
            "Lactating" => Some(CowProductionStatus::Lactating),
            "Dry" => Some(CowProductionStatus::Dry),
            "Culled" => Some(CowProductionStatus::Culled),
            _ => None,
        }
    }
}

impl fmt::Display for CowProductionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 牛只类别 (Cow Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CowCategory {
    Calf,
    Weaner,
    Heifer,
    Bull,
    MilkingCow,
}

impl CowCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CowCategory::Calf => "Calf",
            CowCategory::Weaner => "Weaner",
            CowCategory::Heifer => "Heifer",
            CowCategory::Bull => "Bull",
            CowCategory::MilkingCow => "Milking Cow",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Calf" => Some(CowCategory::Calf),
            "Weaner" => Some(CowCategory::Weaner),
            "Heifer" => Some(CowCategory::Heifer),
            "Bull" => Some(CowCategory::Bull),
            "Milking Cow" => Some(CowCategory::MilkingCow),
            _ => None,
        }
    }
}

impl fmt::Display for CowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 淘汰原因 (Culling Reason)
// ==========================================
// 分组: 医疗 / 财务 / 生产 / 遗传 / 环境 / 法规
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CullingReason {
    // 医疗
    Injuries,
    ChronicHealth,
    // 财务
    CostOfCare,
    Unprofitable,
    LowMarketDemand,
    // 生产
    Age,
    ConsistentLowProduction,
    ConsistentPoorQuality,
    InefficientFeedConversion,
    // 遗传
    InheritedDiseases,
    Inbreeding,
    UnwantedTraits,
    // 环境
    ClimateChange,
    NaturalDisaster,
    Overpopulation,
    // 法规
    GovernmentRegulations,
    AnimalWelfareStandards,
    EnvironmentProtectionLaws,
}

impl CullingReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CullingReason::Injuries => "Injuries",
            CullingReason::ChronicHealth => "Chronic Health Issues",
            CullingReason::CostOfCare => "Cost Of Care",
            CullingReason::Unprofitable => "Unprofitable",
            CullingReason::LowMarketDemand => "Low Market Demand",
            CullingReason::Age => "Age",
            CullingReason::ConsistentLowProduction => "Consistent Low Production",
            CullingReason::ConsistentPoorQuality => "Low Quality",
            CullingReason::InefficientFeedConversion => "Inefficient Feed Conversion",
            CullingReason::InheritedDiseases => "Inherited Diseases",
            CullingReason::Inbreeding => "Inbreeding",
            CullingReason::UnwantedTraits => "Unwanted Traits",
            CullingReason::ClimateChange => "Climate Change",
            CullingReason::NaturalDisaster => "Natural Disaster",
            CullingReason::Overpopulation => "Overpopulation",
            CullingReason::GovernmentRegulations => "Government Regulations",
            CullingReason::AnimalWelfareStandards => "Animal Welfare Standards",
            CullingReason::EnvironmentProtectionLaws => "Environmental Protection Laws",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Injuries" => Some(CullingReason::Injuries),
            "Chronic Health Issues" => Some(CullingReason::ChronicHealth),
            "Cost Of Care" => Some(CullingReason::CostOfCare),
            "Unprofitable" => Some(CullingReason::Unprofitable),
            "Low Market Demand" => Some(CullingReason::LowMarketDemand),
            "Age" => Some(CullingReason::Age),
            "Consistent Low Production" => Some(CullingReason::ConsistentLowProduction),
            "Low Quality" => Some(CullingReason::ConsistentPoorQuality),
            "Inefficient Feed Conversion" => Some(CullingReason::InefficientFeedConversion),
            "Inherited Diseases" => Some(CullingReason::InheritedDiseases),
            "Inbreeding" => Some(CullingReason::Inbreeding),
            "Unwanted Traits" => Some(CullingReason::UnwantedTraits),
            "Climate Change" => Some(CullingReason::ClimateChange),
            "Natural Disaster" => Some(CullingReason::NaturalDisaster),
            "Overpopulation" => Some(CullingReason::Overpopulation),
            "Government Regulations" => Some(CullingReason::GovernmentRegulations),
            "Animal Welfare Standards" => Some(CullingReason::AnimalWelfareStandards),
            "Environmental Protection Laws" => Some(CullingReason::EnvironmentProtectionLaws),
            _ => None,
        }
    }
}

impl fmt::Display for CullingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 隔离原因 (Quarantine Reason)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuarantineReason {
    SickCow,
    BoughtCow,
    NewCow,
    Calving,
}

impl QuarantineReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuarantineReason::SickCow => "Sick Cow",
            QuarantineReason::BoughtCow => "Bought Cow",
            QuarantineReason::NewCow => "New Cow",
            QuarantineReason::Calving => "Calving",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Sick Cow" => Some(QuarantineReason::SickCow),
            "Bought Cow" => Some(QuarantineReason::BoughtCow),
            "New Cow" => Some(QuarantineReason::NewCow),
            "Calving" => Some(QuarantineReason::Calving),
            _ => None,
        }
    }
}

impl fmt::Display for QuarantineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 病原体 (Pathogen)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathogenName {
    Bacteria,
    Virus,
    Fungi,
    Unknown,
}

impl PathogenName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathogenName::Bacteria => "Bacteria",
            PathogenName::Virus => "Virus",
            PathogenName::Fungi => "Fungi",
            PathogenName::Unknown => "Unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Bacteria" => Some(PathogenName::Bacteria),
            "Virus" => Some(PathogenName::Virus),
            "Fungi" => Some(PathogenName::Fungi),
            "Unknown" => Some(PathogenName::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for PathogenName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 疾病类别 (Disease Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseCategoryName {
    Nutrition,
    Infectious,
    Physiological,
    Genetic,
}

impl DiseaseCategoryName {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiseaseCategoryName::Nutrition => "Nutrition",
            DiseaseCategoryName::Infectious => "Infectious",
            DiseaseCategoryName::Physiological => "Physiological",
            DiseaseCategoryName::Genetic => "Genetic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Nutrition" => Some(DiseaseCategoryName::Nutrition),
            "Infectious" => Some(DiseaseCategoryName::Infectious),
            "Physiological" => Some(DiseaseCategoryName::Physiological),
            "Genetic" => Some(DiseaseCategoryName::Genetic),
            _ => None,
        }
    }
}

impl fmt::Display for DiseaseCategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 症状类型 / 严重度 / 部位 (Symptom)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymptomType {
    Respiratory,
    Digestive,
    Reproductive,
    Physical,
    Musculoskeletal,
    Metabolic,
    Other,
}

impl SymptomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymptomType::Respiratory => "Respiratory",
            SymptomType::Digestive => "Digestive",
            SymptomType::Reproductive => "Reproductive",
            SymptomType::Physical => "Physical",
            SymptomType::Musculoskeletal => "Musculoskeletal",
            SymptomType::Metabolic => "Metabolic",
            SymptomType::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Respiratory" => Some(SymptomType::Respiratory),
            "Digestive" => Some(SymptomType::Digestive),
            "Reproductive" => Some(SymptomType::Reproductive),
            "Physical" => Some(SymptomType::Physical),
            "Musculoskeletal" => Some(SymptomType::Musculoskeletal),
            "Metabolic" => Some(SymptomType::Metabolic),
            "Other" => Some(SymptomType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for SymptomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymptomSeverity {
    Mild,
    Moderate,
    Severe,
}

impl SymptomSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymptomSeverity::Mild => "Mild",
            SymptomSeverity::Moderate => "Moderate",
            SymptomSeverity::Severe => "Severe",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Mild" => Some(SymptomSeverity::Mild),
            "Moderate" => Some(SymptomSeverity::Moderate),
            "Severe" => Some(SymptomSeverity::Severe),
            _ => None,
        }
    }
}

impl fmt::Display for SymptomSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymptomLocation {
    Head,
    Neck,
    Chest,
    Abdomen,
    Back,
    Legs,
    Tail,
    WholeBody,
    Other,
}

impl SymptomLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymptomLocation::Head => "Head",
            SymptomLocation::Neck => "Neck",
            SymptomLocation::Chest => "Chest",
            SymptomLocation::Abdomen => "Abdomen",
            SymptomLocation::Back => "Back",
            SymptomLocation::Legs => "Legs",
            SymptomLocation::Tail => "Tail",
            SymptomLocation::WholeBody => "Whole body",
            SymptomLocation::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Head" => Some(SymptomLocation::Head),
            "Neck" => Some(SymptomLocation::Neck),
            "Chest" => Some(SymptomLocation::Chest),
            "Abdomen" => Some(SymptomLocation::Abdomen),
            "Back" => Some(SymptomLocation::Back),
            "Legs" => Some(SymptomLocation::Legs),
            "Tail" => Some(SymptomLocation::Tail),
            "Whole body" => Some(SymptomLocation::WholeBody),
            "Other" => Some(SymptomLocation::Other),
            _ => None,
        }
    }
}

impl fmt::Display for SymptomLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 治疗状态 (Treatment Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreatmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Postponed,
}

impl TreatmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreatmentStatus::Scheduled => "Scheduled",
            TreatmentStatus::InProgress => "In Progress",
            TreatmentStatus::Completed => "Completed",
            TreatmentStatus::Cancelled => "Cancelled",
            TreatmentStatus::Postponed => "Postponed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Scheduled" => Some(TreatmentStatus::Scheduled),
            "In Progress" => Some(TreatmentStatus::InProgress),
            "Completed" => Some(TreatmentStatus::Completed),
            "Cancelled" => Some(TreatmentStatus::Cancelled),
            "Postponed" => Some(TreatmentStatus::Postponed),
            _ => None,
        }
    }
}

impl fmt::Display for TreatmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 妊娠记录状态 / 结局 (Pregnancy Record)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PregnancyStatus {
    Unconfirmed,
    Confirmed,
    Failed,
}

impl PregnancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PregnancyStatus::Unconfirmed => "Unconfirmed",
            PregnancyStatus::Confirmed => "Confirmed",
            PregnancyStatus::Failed => "Failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Unconfirmed" => Some(PregnancyStatus::Unconfirmed),
            "Confirmed" => Some(PregnancyStatus::Confirmed),
            "Failed" => Some(PregnancyStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for PregnancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PregnancyOutcome {
    Live,
    Stillborn,
    Miscarriage,
}

impl PregnancyOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PregnancyOutcome::Live => "Live",
            PregnancyOutcome::Stillborn => "Stillborn",
            PregnancyOutcome::Miscarriage => "Miscarriage",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Live" => Some(PregnancyOutcome::Live),
            "Stillborn" => Some(PregnancyOutcome::Stillborn),
            "Miscarriage" => Some(PregnancyOutcome::Miscarriage),
            _ => None,
        }
    }
}

impl fmt::Display for PregnancyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
