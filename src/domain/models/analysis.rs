use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeMetadata {
    pub length: u64,
    pub gc_content: f64,
    pub orf_count: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceGene {
    pub gene: String,
    #[serde(rename = "class")]
    pub gene_class: String,
    pub confidence: f64,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinStructure {
    pub structure_id: String,
    pub confidence_score: f64,
    pub folding_type: String,
    pub description: String,
    pub molecular_weight: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirulenceData {
    #[serde(rename = "virulenceScore")]
    pub virulence_score: f64,
    pub factors: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HgtData {
    pub risk: String,
    pub score: f64,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedMl {
    pub virulence: VirulenceData,
    pub hgt_risk: HgtData,
}

/// Response contract of the external genome-analysis service.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metadata: GenomeMetadata,
    pub resistance_genes: Vec<ResistanceGene>,
    pub crispr_status: String,
    pub risk_score: f64,
    pub risk_level: String,
    pub explanation: String,
    pub protein_structure: Option<ProteinStructure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_ml: Option<AdvancedMl>,
}

impl AnalysisResult {
    /// Renders the analysis as the structured ML-output text the summarize
    /// stage consumes. Raw sequence bytes never travel further than this.
    pub fn to_ml_output(&self) -> Result<String> {
        return Ok(serde_json::to_string_pretty(self)?);
    }
}
