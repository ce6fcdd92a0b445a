//! Name pools and unique-name allocation
//!
//! Principal names are built from first/last name pools with a numeric
//! suffix that makes collisions impossible regardless of pool size.

use rand::rngs::StdRng;
use rand::Rng;

pub const FIRST_NAMES: &[&str] = &[
    "JAMES", "MARY", "ROBERT", "PATRICIA", "JOHN", "JENNIFER", "MICHAEL", "LINDA", "DAVID",
    "ELIZABETH", "WILLIAM", "BARBARA", "RICHARD", "SUSAN", "JOSEPH", "JESSICA", "THOMAS", "SARAH",
    "CHARLES", "KAREN", "CHRISTOPHER", "LISA", "DANIEL", "NANCY", "MATTHEW", "BETTY", "ANTHONY",
    "MARGARET", "MARK", "SANDRA", "DONALD", "ASHLEY", "STEVEN", "KIMBERLY", "PAUL", "EMILY",
    "ANDREW", "DONNA", "JOSHUA", "MICHELLE", "KENNETH", "DOROTHY", "KEVIN", "CAROL", "BRIAN",
    "AMANDA", "GEORGE", "MELISSA", "EDWARD", "DEBORAH", "RONALD", "STEPHANIE", "TIMOTHY",
    "REBECCA", "JASON", "SHARON", "JEFFREY", "LAURA", "RYAN", "CYNTHIA", "JACOB", "KATHLEEN",
    "GARY", "AMY",
];

pub const LAST_NAMES: &[&str] = &[
    "SMITH", "JOHNSON", "WILLIAMS", "BROWN", "JONES", "GARCIA", "MILLER", "DAVIS", "RODRIGUEZ",
    "MARTINEZ", "HERNANDEZ", "LOPEZ", "GONZALEZ", "WILSON", "ANDERSON", "THOMAS", "TAYLOR",
    "MOORE", "JACKSON", "MARTIN", "LEE", "PEREZ", "THOMPSON", "WHITE", "HARRIS", "SANCHEZ",
    "CLARK", "RAMIREZ", "LEWIS", "ROBINSON", "WALKER", "YOUNG", "ALLEN", "KING", "WRIGHT",
    "SCOTT", "TORRES", "NGUYEN", "HILL", "FLORES", "GREEN", "ADAMS", "NELSON", "BAKER", "HALL",
    "RIVERA", "CAMPBELL", "MITCHELL", "CARTER", "ROBERTS", "GOMEZ", "PHILLIPS", "EVANS",
    "TURNER", "DIAZ", "PARKER", "CRUZ", "EDWARDS", "COLLINS", "REYES", "STEWART", "MORRIS",
    "MORALES", "MURPHY",
];

/// Hands out unique principal names for one run.
#[derive(Debug, Default)]
pub struct NamePool {
    user_counter: u32,
    computer_counter: u32,
    group_counter: u32,
}

impl NamePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A display name drawn from the pools, e.g. "JAMES SMITH".
    pub fn display_name(&self, rng: &mut StdRng) -> (String, String) {
        let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
        (first.to_string(), last.to_string())
    }

    /// A unique user principal name, e.g. "JAMESSMITH00001@TESTLAB.LOCAL".
    pub fn user_name(&mut self, rng: &mut StdRng, domain: &str) -> (String, String) {
        let (first, last) = self.display_name(rng);
        self.user_counter += 1;
        let name = format!("{}{}{:05}@{}", first, last, self.user_counter, domain);
        let display = format!("{} {}", first, last);
        (name, display)
    }

    /// A unique machine name, e.g. "COMP00001.TESTLAB.LOCAL".
    pub fn computer_name(&mut self, domain: &str, prefix: &str) -> String {
        self.computer_counter += 1;
        format!("{}{:05}.{}", prefix, self.computer_counter, domain)
    }

    /// A unique group name scoped by department, tier and location.
    pub fn group_name(&mut self, domain: &str, department: &str, tier: usize, location: u32) -> String {
        self.group_counter += 1;
        format!(
            "{}_T{}_L{}_{:05}@{}",
            department, tier, location, self.group_counter, domain
        )
    }
}
