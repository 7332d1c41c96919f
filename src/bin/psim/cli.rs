use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use pharmsim::game::GameMode;
use pharmsim::pharm::excipient::{Category, DosageForm, Manufacturing, Solubility, Stability};
use pharmsim::pharm::interaction::{ClinicalCase, InteractionType};
use pharmsim::pharm::ionization::IonizationCase;
use pharmsim::pharm::physical::ReactionOrder;
use pharmsim::pharm::pk::PkCase;

#[derive(Parser)]
#[command(
    name = "psim",
    about = "Pharmaceutics and pharmacology simulations with a Rule-of-5 design game",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub output: OutputOptions,

    /// TOML file overriding the built-in defaults
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// First-order dissolution with T50/T90 and a sampling table
    #[command(visible_alias = "diss")]
    Dissolution(DissolutionArgs),

    /// Henderson-Hasselbalch ionization profiles
    #[command(visible_alias = "ion")]
    Ionization(IonizationArgs),

    /// Lognormal particle sizes and Noyes-Whitney dissolution
    Particle(ParticleArgs),

    /// Pharmacokinetic models
    Pk {
        #[command(subcommand)]
        command: PkCommand,
    },

    /// Pharmacodynamic models
    Pd {
        #[command(subcommand)]
        command: PdCommand,
    },

    /// Diffusion and controlled-release kinetics
    Release {
        #[command(subcommand)]
        command: ReleaseCommand,
    },

    /// Physical pharmacy: solubility, surfaces, buffers, rheology, stability
    #[command(visible_alias = "phys")]
    Physical {
        #[command(subcommand)]
        command: PhysicalCommand,
    },

    /// Drug-drug interactions
    Ddi {
        #[command(subcommand)]
        command: DdiCommand,
    },

    /// Excipient database, compatibility and formulation design
    #[command(visible_alias = "exc")]
    Excipient {
        #[command(subcommand)]
        command: ExcipientCommand,
    },

    /// Parse a SMILES string and check it against the Rule of 5
    Mol(MolArgs),

    /// Play the Lipinski design game over a JSON session file
    Game(GameArgs),
}

/// Output options shared by all commands.
#[derive(Args)]
#[command(next_help_heading = "Output")]
pub struct OutputOptions {
    /// Output file (format inferred from .csv, .json, .sdf or .txt)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Output format, overriding the file extension
    #[arg(long = "format", value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Suppress banner and progress output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Boxed text tables
    Table,
    /// Comma-separated curve data
    Csv,
    /// Full result as JSON
    Json,
    /// V2000 mol block (molecules only)
    Sdf,
}

// ----------------------------------------------------------------------------
// Dissolution, ionization, particle size
// ----------------------------------------------------------------------------

#[derive(Args)]
pub struct DissolutionArgs {
    #[command(flatten)]
    pub model: DissolutionModel,

    /// Simulated duration in hours (defaults to the configured value)
    #[arg(long, value_name = "H")]
    pub duration: Option<f64>,

    /// Print the sampling table instead of the dense curve
    #[arg(long)]
    pub table: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Dissolution Model")]
pub struct DissolutionModel {
    /// First-order rate constant (1/h)
    #[arg(short = 'k', long, value_name = "K", default_value = "0.1")]
    pub k: f64,

    /// Half-life in hours; replaces --k when given
    #[arg(long = "half-life", value_name = "H")]
    pub half_life: Option<f64>,

    /// Drug load (mg)
    #[arg(long, value_name = "MG", default_value = "100.0")]
    pub dose: f64,

    /// Medium volume (mL)
    #[arg(long, value_name = "ML", default_value = "500.0")]
    pub volume: f64,
}

#[derive(Args)]
pub struct IonizationArgs {
    /// Drug pKa
    #[arg(long, value_name = "PKA", default_value = "7.0", allow_hyphen_values = true)]
    pub pka: f64,

    /// Acid or base
    #[arg(long, value_name = "KIND", default_value = "acid")]
    pub kind: DrugKindArg,

    /// Evaluate a single pH instead of the full profile
    #[arg(long, value_name = "PH")]
    pub ph: Option<f64>,

    /// Case study (aspirin, morphine, lidocaine)
    #[arg(long, value_name = "DRUG", conflicts_with_all = ["pka", "kind", "ph"])]
    pub case: Option<IonizationCase>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DrugKindArg {
    Acid,
    Base,
}

#[derive(Args)]
pub struct ParticleArgs {
    /// Mean particle size (μm)
    #[arg(long, value_name = "UM", default_value = "20.0")]
    pub mean: f64,

    /// Spread of the lognormal distribution
    #[arg(long, value_name = "SIGMA", default_value = "0.4")]
    pub sigma: f64,

    /// Number of sampled particles (defaults to the configured value)
    #[arg(long, value_name = "N")]
    pub samples: Option<usize>,

    /// Random seed (defaults to the configured value)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Show the size histogram instead of the dissolution profile
    #[arg(long)]
    pub histogram: bool,

    /// Compare the grades of a case study
    #[arg(long, value_name = "DRUG", conflicts_with_all = ["mean", "sigma", "histogram"])]
    pub case: Option<ParticleCaseArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParticleCaseArg {
    Griseofulvin,
    Ibuprofen,
    /// Micronized versus regular material
    Micronization,
}

// ----------------------------------------------------------------------------
// Pharmacokinetics
// ----------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum PkCommand {
    /// One-compartment IV bolus against oral absorption
    Bolus(PkBolusArgs),

    /// Two-compartment IV bolus
    #[command(name = "two-compartment", visible_alias = "two")]
    TwoCompartment(TwoCompartmentArgs),

    /// IV bolus, infusion, oral, IM and SC routes side by side
    Routes(PkRoutesArgs),

    /// Morphine and lidocaine case studies
    Case(PkCaseArgs),
}

#[derive(Args)]
#[command(next_help_heading = "One-Compartment Model")]
pub struct OneCompartmentArgs {
    /// Dose (mg)
    #[arg(long, value_name = "MG", default_value = "500.0")]
    pub dose: f64,

    /// Volume of distribution (L)
    #[arg(long, value_name = "L", default_value = "50.0")]
    pub volume: f64,

    /// Elimination rate constant (1/h)
    #[arg(short = 'k', long, value_name = "K", default_value = "0.5")]
    pub k: f64,
}

#[derive(Args)]
pub struct PkBolusArgs {
    #[command(flatten)]
    pub model: OneCompartmentArgs,

    /// Absorption rate constant for the oral comparison curve (1/h)
    #[arg(long, value_name = "KA", default_value = "1.0")]
    pub ka: f64,

    /// Simulated duration (h)
    #[arg(long, value_name = "H", default_value = "24.0")]
    pub duration: f64,
}

#[derive(Args)]
pub struct TwoCompartmentArgs {
    /// Dose (mg)
    #[arg(long, value_name = "MG", default_value = "500.0")]
    pub dose: f64,

    /// Central volume (L)
    #[arg(long, value_name = "L", default_value = "30.0")]
    pub v1: f64,

    /// Central to peripheral rate constant (1/h)
    #[arg(long, value_name = "K", default_value = "0.5")]
    pub k12: f64,

    /// Peripheral to central rate constant (1/h)
    #[arg(long, value_name = "K", default_value = "0.3")]
    pub k21: f64,

    /// Elimination rate constant (1/h)
    #[arg(long, value_name = "K", default_value = "0.4")]
    pub k10: f64,

    /// Simulated duration (h)
    #[arg(long, value_name = "H", default_value = "24.0")]
    pub duration: f64,
}

#[derive(Args)]
pub struct PkRoutesArgs {
    #[command(flatten)]
    pub model: OneCompartmentArgs,

    /// Absorption rate constant (1/h)
    #[arg(long, value_name = "KA", default_value = "1.0")]
    pub ka: f64,

    /// Infusion duration (h)
    #[arg(long, value_name = "H", default_value = "1.0")]
    pub infusion: f64,

    /// Simulated duration (h)
    #[arg(long, value_name = "H", default_value = "24.0")]
    pub duration: f64,
}

#[derive(Args)]
pub struct PkCaseArgs {
    /// Case study (morphine, lidocaine)
    #[arg(value_name = "DRUG")]
    pub case: PkCase,

    /// Dose (mg); defaults to the case's usual dose
    #[arg(long, value_name = "MG")]
    pub dose: Option<f64>,

    /// Which routes to plot
    #[arg(long, value_name = "VIEW", default_value = "all")]
    pub view: PkViewArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PkViewArg {
    All,
    Intravenous,
    Parenteral,
}

// ----------------------------------------------------------------------------
// Pharmacodynamics
// ----------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum PdCommand {
    /// Receptor occupancy versus concentration
    Binding {
        /// Dissociation constant (nM)
        #[arg(long, value_name = "KD", default_value = "1.0")]
        kd: f64,

        /// Highest concentration on the log grid (nM)
        #[arg(long = "max-conc", value_name = "NM", default_value = "50.0")]
        max_conc: f64,
    },

    /// Hill dose-response curve
    Hill {
        /// Half-maximal concentration
        #[arg(long, value_name = "EC50", default_value = "1.0")]
        ec50: f64,

        /// Hill coefficient
        #[arg(short = 'n', long, value_name = "N", default_value = "1.0")]
        n: f64,
    },

    /// Competitive antagonism shift
    Antagonism {
        /// Antagonist concentration
        #[arg(long, value_name = "CONC", default_value = "0.0")]
        antagonist: f64,

        /// Agonist affinity constant
        #[arg(long = "ka", value_name = "KA", default_value = "1.0")]
        ka_agonist: f64,

        /// Antagonist dissociation constant
        #[arg(long, value_name = "KB", default_value = "2.0")]
        kb: f64,
    },

    /// Therapeutic window between MEC and toxic threshold
    Window {
        /// Minimum effective concentration
        #[arg(long, value_name = "CONC", default_value = "10.0")]
        mec: f64,

        /// Minimum toxic concentration
        #[arg(long, value_name = "CONC", default_value = "100.0")]
        toxic: f64,
    },

    /// Beta-blocker, local anesthetic and anticoagulant case studies
    Case {
        #[command(subcommand)]
        case: PdCase,
    },
}

#[derive(Subcommand)]
pub enum PdCase {
    /// Heart-rate response to a beta-blocker
    #[command(name = "beta-blocker")]
    BetaBlocker {
        /// Baseline heart rate (bpm)
        #[arg(long, value_name = "BPM", default_value = "80.0")]
        baseline: f64,

        /// Half-maximal inhibitory concentration
        #[arg(long, value_name = "IC50", default_value = "1.0")]
        ic50: f64,
    },

    /// Local anesthetic effect versus tissue pH
    Anesthetic {
        /// Anesthetic pKa
        #[arg(long, value_name = "PKA", default_value = "7.9")]
        pka: f64,

        /// Tissue pH
        #[arg(long = "tissue-ph", value_name = "PH", default_value = "7.4")]
        tissue_ph: f64,
    },

    /// INR response to warfarin
    Anticoagulant {
        /// Baseline INR
        #[arg(long, value_name = "INR", default_value = "1.0")]
        baseline: f64,

        /// Target INR
        #[arg(long, value_name = "INR", default_value = "2.5")]
        target: f64,
    },
}

// ----------------------------------------------------------------------------
// Release
// ----------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ReleaseCommand {
    /// Fick's first law flux and linear gradient
    Fick {
        /// Donor concentration (mg/mL)
        #[arg(long, value_name = "C", default_value = "100.0")]
        c1: f64,

        /// Receiver concentration (mg/mL)
        #[arg(long, value_name = "C", default_value = "0.0")]
        c2: f64,

        /// Diffusion coefficient (cm²/s)
        #[arg(short = 'd', long, value_name = "D", default_value = "1e-5")]
        diffusivity: f64,

        /// Membrane thickness (μm)
        #[arg(long, value_name = "UM", default_value = "10.0")]
        thickness: f64,
    },

    /// Fick's second law finite-difference simulation
    Diffusion {
        /// Diffusion coefficient in grid units
        #[arg(short = 'd', long, value_name = "D", default_value = "0.5")]
        diffusivity: f64,

        /// Number of time steps
        #[arg(long, value_name = "N", default_value = "50")]
        steps: usize,
    },

    /// Matrix, first-order and zero-order release side by side
    Compare {
        /// Drug load (mg)
        #[arg(long, value_name = "MG", default_value = "50.0")]
        load: f64,

        /// Which systems to include
        #[arg(long, value_name = "SYSTEM", default_value = "all")]
        system: ReleaseSystemArg,
    },

    /// Controlled-release case studies
    Case {
        #[command(subcommand)]
        case: ReleaseCase,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReleaseSystemArg {
    All,
    Matrix,
    #[value(name = "first-order")]
    FirstOrder,
    #[value(name = "zero-order")]
    ZeroOrder,
}

#[derive(Subcommand)]
pub enum ReleaseCase {
    /// HPMC matrix tablet
    Hpmc {
        /// Drug load (mg)
        #[arg(long, value_name = "MG", default_value = "100.0")]
        load: f64,

        /// Polymer viscosity grade (1-5)
        #[arg(long, value_name = "GRADE", default_value = "3.0")]
        viscosity: f64,

        /// Medium pH
        #[arg(long, value_name = "PH", default_value = "6.8")]
        ph: f64,
    },

    /// Reservoir transdermal patch
    Transdermal {
        /// Reservoir concentration (mg/mL)
        #[arg(long, value_name = "MG_ML", default_value = "50.0")]
        reservoir: f64,

        /// Membrane thickness (μm)
        #[arg(long, value_name = "UM", default_value = "50.0")]
        thickness: f64,

        /// Diffusion coefficient (cm²/h)
        #[arg(short = 'd', long, value_name = "D", default_value = "1e-5")]
        diffusivity: f64,
    },

    /// PLGA microspheres
    Plga {
        /// Lactide share of the copolymer (%)
        #[arg(long, value_name = "PCT", default_value = "75.0")]
        lactide: f64,

        /// Drug loading (%)
        #[arg(long, value_name = "PCT", default_value = "10.0")]
        loading: f64,
    },

    /// Osmotic pump tablet
    Osmotic {
        /// Osmotic pressure (atm)
        #[arg(long, value_name = "ATM", default_value = "20.0")]
        pressure: f64,

        /// Orifice diameter (μm)
        #[arg(long, value_name = "UM", default_value = "500.0")]
        orifice: f64,

        /// Membrane permeability
        #[arg(long, value_name = "P", default_value = "5.0")]
        permeability: f64,

        /// Add seeded measurement noise
        #[arg(long, value_name = "SEED")]
        noise: Option<u64>,
    },

    /// Stimuli-responsive hydrogel
    Hydrogel {
        /// Crosslinking density (%)
        #[arg(long, value_name = "PCT", default_value = "5.0")]
        crosslink: f64,

        /// Temperature (°C)
        #[arg(long, value_name = "C", default_value = "37.0")]
        temperature: f64,

        /// Medium pH
        #[arg(long, value_name = "PH", default_value = "7.4")]
        ph: f64,
    },

    /// Immediate plus sustained biphasic delivery
    Biphasic {
        /// Fraction released in the immediate phase
        #[arg(long, value_name = "F", default_value = "0.4")]
        fraction: f64,

        /// Immediate-phase rate constant (1/h)
        #[arg(long, value_name = "K", default_value = "1.0")]
        k1: f64,

        /// Sustained-phase rate constant (1/h)
        #[arg(long, value_name = "K", default_value = "0.1")]
        k2: f64,
    },
}

// ----------------------------------------------------------------------------
// Physical pharmacy
// ----------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum PhysicalCommand {
    /// Van 't Hoff solubility versus temperature
    Solubility {
        /// Heat of solution (kJ/mol)
        #[arg(long, value_name = "KJ", default_value = "20.0", allow_hyphen_values = true)]
        heat: f64,

        /// Solubility at 25 °C (mg/mL)
        #[arg(long = "ref-solubility", value_name = "MG_ML", default_value = "10.0")]
        ref_solubility: f64,
    },

    /// Szyszkowski surface tension versus surfactant concentration
    Surface {
        /// Surface tension of the pure solvent (mN/m)
        #[arg(long, value_name = "GAMMA", default_value = "72.0")]
        gamma0: f64,

        /// Surfactant constant
        #[arg(short = 'k', long, value_name = "K", default_value = "10.0")]
        k: f64,
    },

    /// Power-law viscosity and shear stress
    Rheology {
        /// Consistency index
        #[arg(short = 'k', long, value_name = "K", default_value = "1.0")]
        k: f64,

        /// Flow behaviour index
        #[arg(short = 'n', long, value_name = "N", default_value = "1.0")]
        n: f64,
    },

    /// Buffer capacity versus pH
    Buffer {
        /// Buffer pKa
        #[arg(long, value_name = "PKA", default_value = "7.0")]
        pka: f64,

        /// Total buffer concentration (M)
        #[arg(long, value_name = "M", default_value = "0.1")]
        conc: f64,
    },

    /// Degradation kinetics with t90 and t50
    Stability {
        /// Reaction order (zero, first, second)
        #[arg(long, value_name = "ORDER", default_value = "zero")]
        order: ReactionOrder,

        /// Rate constant
        #[arg(short = 'k', long, value_name = "K", default_value = "0.01")]
        k: f64,

        /// Initial concentration (mg/mL)
        #[arg(long, value_name = "C0", default_value = "50.0")]
        c0: f64,
    },
}

// ----------------------------------------------------------------------------
// Drug-drug interactions
// ----------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum DdiCommand {
    /// CYP inhibition raising exposure
    Inhibition {
        /// Initial concentration
        #[arg(long, value_name = "C0", default_value = "50.0")]
        c0: f64,

        /// Inhibitor concentration
        #[arg(long, value_name = "CONC", default_value = "5.0")]
        inhibitor: f64,

        /// Inhibition constant
        #[arg(long, value_name = "KI", default_value = "1.0")]
        ki: f64,
    },

    /// Enzyme induction lowering exposure
    Induction {
        /// Initial concentration
        #[arg(long, value_name = "C0", default_value = "50.0")]
        c0: f64,

        /// Fold increase in clearance
        #[arg(long, value_name = "FOLD", default_value = "2.0")]
        fold: f64,
    },

    /// Absorption interaction changing the uptake rate
    Absorption {
        /// Dose (mg)
        #[arg(long, value_name = "MG", default_value = "100.0")]
        dose: f64,

        /// Absorption rate constant (1/h)
        #[arg(long, value_name = "KA", default_value = "0.5")]
        ka: f64,

        /// Multiplier applied to the absorption rate
        #[arg(long, value_name = "FACTOR", default_value = "0.5")]
        factor: f64,
    },

    /// Protein-binding displacement
    Binding {
        /// Total plasma concentration
        #[arg(long, value_name = "CONC", default_value = "100.0")]
        total: f64,

        /// Unbound fraction before displacement
        #[arg(long = "free-fraction", value_name = "F", default_value = "0.1")]
        free_fraction: f64,

        /// Fold rise in the free fraction
        #[arg(long, value_name = "FOLD", default_value = "2.0")]
        displacement: f64,

        /// Clearance of the free drug (1/h)
        #[arg(long, value_name = "CL", default_value = "0.5")]
        clearance: f64,
    },

    /// Combined effect of two drugs
    Combination {
        /// Effect of drug 1 (%)
        #[arg(long, value_name = "PCT", default_value = "50.0")]
        e1: f64,

        /// Effect of drug 2 (%)
        #[arg(long, value_name = "PCT", default_value = "30.0")]
        e2: f64,

        /// Interaction type (additive, synergistic, antagonistic)
        #[arg(long = "type", value_name = "TYPE", default_value = "additive")]
        kind: InteractionType,
    },

    /// Clinical risk score from patient and drug factors
    Risk(RiskArgs),

    /// Warfarin, statin and SSRI clinical case simulations
    Clinical {
        /// Case (warfarin, statin, ssri)
        #[arg(value_name = "CASE")]
        case: ClinicalCase,

        /// Noise seed
        #[arg(long, value_name = "SEED", default_value = "42")]
        seed: u64,
    },
}

#[derive(Args)]
#[command(next_help_heading = "Risk Factors")]
pub struct RiskArgs {
    /// Object drug has a narrow therapeutic index
    #[arg(long = "narrow-index")]
    pub narrow_therapeutic_index: bool,

    /// Object drug is critical to the patient
    #[arg(long)]
    pub critical: bool,

    /// Precipitant is a strong inhibitor or inducer
    #[arg(long)]
    pub strong: bool,

    /// A non-interacting alternative is available
    #[arg(long)]
    pub alternative: bool,
}

// ----------------------------------------------------------------------------
// Excipients
// ----------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ExcipientCommand {
    /// List the excipient database
    List {
        /// Restrict to one category (filler, binder, disintegrant, lubricant)
        #[arg(long, value_name = "CATEGORY")]
        category: Option<Category>,
    },

    /// Compatibility score of two excipients
    Compat {
        #[arg(value_name = "EXCIPIENT")]
        first: String,

        #[arg(value_name = "EXCIPIENT")]
        second: String,
    },

    /// Carr's index from angle of repose and bulk density
    Flow {
        /// Angle of repose (degrees)
        #[arg(long, value_name = "DEG", default_value = "30.0")]
        angle: f64,

        /// Bulk density (g/mL)
        #[arg(long, value_name = "G_ML", default_value = "0.5")]
        bulk: f64,
    },

    /// Excipient recommendations for a dosage form
    Guide(GuideArgs),

    /// Tablet formulation table
    Formulate(FormulateArgs),
}

#[derive(Args)]
#[command(next_help_heading = "Requirements")]
pub struct GuideArgs {
    /// Dosage form (tablet, capsule)
    #[arg(long = "form", value_name = "FORM", default_value = "tablet")]
    pub dosage_form: DosageForm,

    /// Manufacturing process (direct, wet)
    #[arg(long = "process", value_name = "PROCESS", default_value = "direct")]
    pub manufacturing: Manufacturing,

    /// Drug solubility (high, poor)
    #[arg(long, value_name = "LEVEL", default_value = "high")]
    pub solubility: Solubility,

    /// Stability concern (moisture, heat, stable)
    #[arg(long, value_name = "CONCERN", default_value = "stable")]
    pub stability: Stability,
}

#[derive(Args)]
pub struct FormulateArgs {
    /// Total tablet weight (mg)
    #[arg(long, value_name = "MG", default_value = "200.0")]
    pub weight: f64,

    /// API content (mg)
    #[arg(long, value_name = "MG", default_value = "50.0")]
    pub api: f64,

    /// Excipient share as NAME=PERCENT, repeatable
    #[arg(
        short = 'e',
        long = "excipient",
        value_name = "NAME=PCT",
        action = clap::ArgAction::Append,
        required = true
    )]
    pub excipients: Vec<String>,
}

// ----------------------------------------------------------------------------
// Molecules and the design game
// ----------------------------------------------------------------------------

#[derive(Args)]
pub struct MolArgs {
    /// Molecule as SMILES
    #[arg(value_name = "SMILES")]
    pub smiles: String,

    /// Functional group to attach before evaluating, repeatable
    #[arg(short, long = "add", value_name = "GROUP", action = clap::ArgAction::Append)]
    pub add: Vec<String>,

    #[command(flatten)]
    pub depiction: DepictionOptions,
}

#[derive(Args)]
#[command(next_help_heading = "Depiction")]
pub struct DepictionOptions {
    /// Coordinate dimensions for SDF output
    #[arg(long = "dims", value_name = "DIMS", default_value = "3d")]
    pub dims: DimsArg,

    /// Embedding seed (defaults to the configured value)
    #[arg(long = "embed-seed", value_name = "SEED")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DimsArg {
    #[value(name = "2d")]
    Two,
    #[value(name = "3d")]
    Three,
}

#[derive(Args)]
pub struct GameArgs {
    /// Session file, created on first use
    #[arg(short, long, value_name = "FILE", default_value = "psim-session.json")]
    pub session: PathBuf,

    #[command(subcommand)]
    pub action: GameAction,
}

#[derive(Subcommand)]
pub enum GameAction {
    /// Start over at the start molecule
    New {
        /// Game mode (tutorial, design, fix-it, time-trial)
        #[arg(long, value_name = "MODE", default_value = "tutorial")]
        mode: GameMode,
    },

    /// Show the current molecule and score
    Show,

    /// Switch game mode, resetting molecule and score
    Mode {
        #[arg(value_name = "MODE")]
        mode: GameMode,
    },

    /// Attach a functional group from the library
    Add {
        #[arg(value_name = "GROUP")]
        group: String,
    },

    /// Replace the molecule with a SMILES string
    Smiles {
        #[arg(value_name = "SMILES")]
        smiles: String,
    },

    /// Switch the depiction between 2-D and 3-D
    View {
        #[arg(value_name = "DIMS")]
        dims: DimsArg,
    },

    /// List the functional-group library
    Groups,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_output_after_subcommand() {
        let cli = Cli::try_parse_from(["psim", "pk", "bolus", "--dose", "250", "-o", "out.csv"])
            .expect("valid arguments");
        assert_eq!(cli.output.output, Some(PathBuf::from("out.csv")));
        match cli.command {
            Command::Pk {
                command: PkCommand::Bolus(args),
            } => assert_eq!(args.model.dose, 250.0),
            _ => panic!("expected pk bolus"),
        }
    }

    #[test]
    fn library_enums_parse_through_from_str() {
        let cli = Cli::try_parse_from(["psim", "physical", "stability", "--order", "zero"])
            .expect("valid arguments");
        match cli.command {
            Command::Physical {
                command: PhysicalCommand::Stability { order, .. },
            } => assert_eq!(order, ReactionOrder::Zero),
            _ => panic!("expected physical stability"),
        }

        let cli = Cli::try_parse_from(["psim", "game", "mode", "time-trial"]).expect("valid arguments");
        match cli.command {
            Command::Game(GameArgs {
                action: GameAction::Mode { mode },
                ..
            }) => assert_eq!(mode, GameMode::TimeTrial),
            _ => panic!("expected game mode"),
        }
    }

    #[test]
    fn rejects_unknown_case() {
        assert!(Cli::try_parse_from(["psim", "pk", "case", "aspirin"]).is_err());
    }
}
