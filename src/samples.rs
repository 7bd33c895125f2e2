//! Built-in example expressions.

/// A named example expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Sample {
    /// Short identifier usable on the command line.
    pub slug: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// TeX markup.
    pub markup: &'static str,
}

/// The sample catalog, in display order.
pub const SAMPLES: &[Sample] = &[
    Sample {
        slug: "pythagoras",
        title: "Pythagorean theorem",
        markup: "a^2 + b^2 = c^2",
    },
    Sample {
        slug: "quadratic",
        title: "Quadratic formula",
        markup: "x = \\frac{-b \\pm \\sqrt{b^2-4ac}}{2a}",
    },
    Sample {
        slug: "mass-energy",
        title: "Mass-energy equivalence",
        markup: "E = mc^2",
    },
    Sample {
        slug: "euler",
        title: "Euler's identity",
        markup: "e^{i\\pi} + 1 = 0",
    },
    Sample {
        slug: "gaussian-integral",
        title: "Gaussian integral",
        markup: "\\int_0^\\infty e^{-x^2} dx = \\frac{\\sqrt{\\pi}}{2}",
    },
    Sample {
        slug: "basel",
        title: "Basel sum",
        markup: "\\sum_{n=1}^\\infty \\frac{1}{n^2} = \\frac{\\pi^2}{6}",
    },
];

/// Look up a sample by slug (case-insensitive) or 1-based index.
pub fn find_sample(key: &str) -> Option<&'static Sample> {
    let key = key.trim();
    if let Ok(n) = key.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| SAMPLES.get(i));
    }
    SAMPLES.iter().find(|s| s.slug.eq_ignore_ascii_case(key))
}

#[cfg(test)]
#[path = "../tests/unit/samples.rs"]
mod tests;
