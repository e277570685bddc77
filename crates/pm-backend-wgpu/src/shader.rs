// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fmt::Write;

use pm_core::KernelVariant;

const APPLY_WGSL_TEMPLATE: &str = include_str!("shaders/heritage_apply.wgsl");

/// Invocations per workgroup along x.
pub const WORKGROUP_SIZE: u32 = 64;

/// WGSL source of the apply kernel specialised for `variant`.
pub fn shader_source(variant: KernelVariant) -> String {
    APPLY_WGSL_TEMPLATE
        .replace("{POINTS_PER_ROW}", &variant.points_per_row().to_string())
        .replace("{WORKGROUP_SIZE}", &WORKGROUP_SIZE.to_string())
        .replace("{SATURATION}", &saturation_block(variant))
}

/// Clamp against the live ring entries, unrolled over the variant's ring.
fn saturation_block(variant: KernelVariant) -> String {
    let Some(ring) = variant.ring() else {
        return String::new();
    };
    let mut block = String::from(
        "    var lo = 0.0;\n    var hi = 0.0;\n    var live = false;\n",
    );
    for position in ring {
        // Writing into a String cannot fail.
        let _ = write!(
            block,
            concat!(
                "    {{\n",
                "        let ring_entry = stencil[base + {position}u];\n",
                "        if (ring_entry.weight != 0.0) {{\n",
                "            let sample = field_in[ring_entry.source];\n",
                "            if (live) {{\n",
                "                lo = min(lo, sample);\n",
                "                hi = max(hi, sample);\n",
                "            }} else {{\n",
                "                lo = sample;\n",
                "                hi = sample;\n",
                "                live = true;\n",
                "            }}\n",
                "        }}\n",
                "    }}\n",
            ),
            position = position,
        );
    }
    block.push_str("    if (live) {\n        acc = clamp(acc, lo, hi);\n    }\n");
    block
}

pub(crate) fn label(variant: KernelVariant) -> String {
    format!("pm.backend.wgpu.heritage_apply.{variant}")
}
