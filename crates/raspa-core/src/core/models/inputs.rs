use std::fmt;
use std::path::{Path, PathBuf};

/// The role a file plays in a RASPA simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    MixingRules,
    PseudoAtoms,
    Framework,
    Adsorbate,
    SimulationInput,
}

impl InputKind {
    pub const ALL: [InputKind; 5] = [
        InputKind::MixingRules,
        InputKind::PseudoAtoms,
        InputKind::Framework,
        InputKind::Adsorbate,
        InputKind::SimulationInput,
    ];

    /// Multipart field name the service expects for this file.
    pub fn field_name(self) -> &'static str {
        match self {
            InputKind::MixingRules => "force_field_mixing_rules",
            InputKind::PseudoAtoms => "pseudo_atoms",
            InputKind::Framework => "mof_cif",
            InputKind::Adsorbate => "adsorbate_def",
            InputKind::SimulationInput => "simulation_input",
        }
    }

    /// Human-readable name used in messages.
    pub fn label(self) -> &'static str {
        match self {
            InputKind::MixingRules => "force-field mixing rules",
            InputKind::PseudoAtoms => "pseudo atoms",
            InputKind::Framework => "framework structure",
            InputKind::Adsorbate => "adsorbate definition",
            InputKind::SimulationInput => "simulation input",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five local files uploaded for one simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationInputs {
    pub mixing_rules: PathBuf,
    pub pseudo_atoms: PathBuf,
    pub framework: PathBuf,
    pub adsorbate: PathBuf,
    pub simulation_input: PathBuf,
}

impl SimulationInputs {
    pub fn new(
        mixing_rules: impl Into<PathBuf>,
        pseudo_atoms: impl Into<PathBuf>,
        framework: impl Into<PathBuf>,
        adsorbate: impl Into<PathBuf>,
        simulation_input: impl Into<PathBuf>,
    ) -> Self {
        Self {
            mixing_rules: mixing_rules.into(),
            pseudo_atoms: pseudo_atoms.into(),
            framework: framework.into(),
            adsorbate: adsorbate.into(),
            simulation_input: simulation_input.into(),
        }
    }

    pub fn path(&self, kind: InputKind) -> &Path {
        match kind {
            InputKind::MixingRules => &self.mixing_rules,
            InputKind::PseudoAtoms => &self.pseudo_atoms,
            InputKind::Framework => &self.framework,
            InputKind::Adsorbate => &self.adsorbate,
            InputKind::SimulationInput => &self.simulation_input,
        }
    }

    /// Every input paired with its role, in upload order.
    pub fn iter(&self) -> impl Iterator<Item = (InputKind, &Path)> + '_ {
        InputKind::ALL.into_iter().map(|kind| (kind, self.path(kind)))
    }
}
