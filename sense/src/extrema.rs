//! Single-pass extremum extraction over the corrected curve.
//!
//! This is deliberately not an exact top-3. Each value is compared against
//! slot 0 first; beating slot 0 demotes slots 0 and 1 one place down.
//! Failing that, the value is compared only against slot 1, then only
//! against slot 2, and replaces that slot *without* demoting -- so a value
//! bumped out of slot 1 is lost even when it still belongs in slot 2.
//! Classification thresholds were tuned against this scan, so the policy is
//! part of the behavior, not an implementation detail.

/// Three largest and three smallest bins of a curve, with bin indices.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExtremaSet {
    pub maxs: [f32; 3],
    pub arg_maxs: [usize; 3],
    pub mins: [f32; 3],
    pub arg_mins: [usize; 3],
}

/// Scan the curve once, in bin order.
pub fn scan(curve: &[f32]) -> ExtremaSet {
    let mut set = ExtremaSet {
        maxs: [f32::NEG_INFINITY; 3],
        arg_maxs: [0; 3],
        mins: [f32::INFINITY; 3],
        arg_mins: [0; 3],
    };

    for (i, &value) in curve.iter().enumerate() {
        if value > set.maxs[0] {
            set.maxs[2] = set.maxs[1];
            set.arg_maxs[2] = set.arg_maxs[1];
            set.maxs[1] = set.maxs[0];
            set.arg_maxs[1] = set.arg_maxs[0];
            set.maxs[0] = value;
            set.arg_maxs[0] = i;
        } else if value > set.maxs[1] {
            set.maxs[1] = value;
            set.arg_maxs[1] = i;
        } else if value > set.maxs[2] {
            set.maxs[2] = value;
            set.arg_maxs[2] = i;
        }

        if value < set.mins[0] {
            set.mins[2] = set.mins[1];
            set.arg_mins[2] = set.arg_mins[1];
            set.mins[1] = set.mins[0];
            set.arg_mins[1] = set.arg_mins[0];
            set.mins[0] = value;
            set.arg_mins[0] = i;
        } else if value < set.mins[1] {
            set.mins[1] = value;
            set.arg_mins[1] = i;
        } else if value < set.mins[2] {
            set.mins[2] = value;
            set.arg_mins[2] = i;
        }
    }

    set
}
