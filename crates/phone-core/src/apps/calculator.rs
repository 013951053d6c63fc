use super::BackOutcome;
use super::StackCtx;
use super::ViewFrame;
use super::ViewStack;
use crate::reducer::PhoneEffect;

pub const ERROR_DISPLAY: &str = "Error";
const MAX_DIGITS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }

    /// `None` for division by zero.
    fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        match self {
            Self::Add => Some(lhs + rhs),
            Self::Subtract => Some(lhs - rhs),
            Self::Multiply => Some(lhs * rhs),
            Self::Divide if rhs == 0.0 => None,
            Self::Divide => Some(lhs / rhs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorInput {
    Digit(u8),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    ToggleSign,
    Percent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorStack {
    pub display: String,
    pub pending: Option<f64>,
    pub operator: Option<Operator>,
    pub waiting_for_operand: bool,
}

impl Default for CalculatorStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorStack {
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            pending: None,
            operator: None,
            waiting_for_operand: false,
        }
    }

    pub fn handle(&mut self, input: CalculatorInput) -> Vec<PhoneEffect> {
        match input {
            CalculatorInput::Digit(digit) if digit <= 9 => self.input_digit(digit),
            CalculatorInput::Digit(_) => return Vec::new(),
            CalculatorInput::Decimal => self.input_decimal(),
            CalculatorInput::Operator(operator) => self.input_operator(operator),
            CalculatorInput::Equals => self.equals(),
            CalculatorInput::Clear => *self = Self::new(),
            CalculatorInput::ToggleSign => self.map_display(|value| -value),
            CalculatorInput::Percent => self.map_display(|value| value / 100.0),
        }
        vec![PhoneEffect::RequestFrame]
    }

    fn input_digit(&mut self, digit: u8) {
        let digit = char::from(b'0' + digit);
        if self.waiting_for_operand || self.display == ERROR_DISPLAY {
            self.display = digit.to_string();
            self.waiting_for_operand = false;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else if self.display.len() < MAX_DIGITS {
            self.display.push(digit);
        }
    }

    fn input_decimal(&mut self) {
        if self.waiting_for_operand || self.display == ERROR_DISPLAY {
            self.display = "0.".to_string();
            self.waiting_for_operand = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Chained operators fold the running total left to right.
    fn input_operator(&mut self, next: Operator) {
        let Some(value) = self.current_value() else {
            return;
        };
        match (self.pending, self.operator) {
            (Some(lhs), Some(operator)) if !self.waiting_for_operand => {
                match operator.apply(lhs, value) {
                    Some(result) => {
                        self.display = format_number(result);
                        self.pending = Some(result);
                    }
                    None => return self.fail(),
                }
            }
            (Some(_), Some(_)) => {}
            _ => self.pending = Some(value),
        }
        self.operator = Some(next);
        self.waiting_for_operand = true;
    }

    fn equals(&mut self) {
        let (Some(lhs), Some(operator)) = (self.pending, self.operator) else {
            return;
        };
        let Some(rhs) = self.current_value() else {
            return;
        };
        match operator.apply(lhs, rhs) {
            Some(result) => {
                self.display = format_number(result);
                self.pending = None;
                self.operator = None;
                self.waiting_for_operand = true;
            }
            None => self.fail(),
        }
    }

    fn map_display(&mut self, map: impl FnOnce(f64) -> f64) {
        if let Some(value) = self.current_value() {
            self.display = format_number(map(value));
        }
    }

    fn current_value(&self) -> Option<f64> {
        self.display.parse::<f64>().ok()
    }

    fn fail(&mut self) {
        self.display = ERROR_DISPLAY.to_string();
        self.pending = None;
        self.operator = None;
        self.waiting_for_operand = true;
    }
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

impl ViewStack for CalculatorStack {
    fn frame(&self) -> ViewFrame {
        ViewFrame {
            title: "Calculator".to_string(),
            view: "keypad",
            loading: false,
            degraded: false,
            is_initial: true,
        }
    }

    fn activate(&mut self, _ctx: &mut StackCtx<'_>) -> Vec<PhoneEffect> {
        Vec::new()
    }

    fn back(&mut self, _ctx: &mut StackCtx<'_>) -> BackOutcome {
        BackOutcome::CloseApp
    }

    fn on_close(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use super::CalculatorInput::Decimal;
    use super::CalculatorInput::Digit;
    use super::CalculatorInput::Equals;

    fn press(stack: &mut CalculatorStack, keys: &[CalculatorInput]) {
        for key in keys {
            stack.handle(*key);
        }
    }

    #[test]
    fn chained_operators_evaluate_left_to_right() {
        let mut stack = CalculatorStack::new();
        press(
            &mut stack,
            &[
                Digit(2),
                CalculatorInput::Operator(Operator::Add),
                Digit(3),
                CalculatorInput::Operator(Operator::Multiply),
            ],
        );
        assert_eq!(stack.display, "5");
        press(&mut stack, &[Digit(4), Equals]);
        assert_eq!(stack.display, "20");
    }

    #[test]
    fn division_by_zero_shows_error_and_resets() {
        let mut stack = CalculatorStack::new();
        press(
            &mut stack,
            &[Digit(7), CalculatorInput::Operator(Operator::Divide), Digit(0), Equals],
        );
        assert_eq!(stack.display, ERROR_DISPLAY);
        assert_eq!(stack.pending, None);
        assert_eq!(stack.operator, None);

        press(&mut stack, &[Digit(4)]);
        assert_eq!(stack.display, "4");
    }

    #[test]
    fn decimal_sign_and_percent() {
        let mut stack = CalculatorStack::new();
        press(&mut stack, &[Digit(1), Decimal, Decimal, Digit(5)]);
        assert_eq!(stack.display, "1.5");
        press(&mut stack, &[CalculatorInput::ToggleSign]);
        assert_eq!(stack.display, "-1.5");
        press(&mut stack, &[CalculatorInput::Clear, Digit(5), Digit(0), CalculatorInput::Percent]);
        assert_eq!(stack.display, "0.5");
    }

    #[test]
    fn repeated_operator_only_replaces_pending_operator() {
        let mut stack = CalculatorStack::new();
        press(
            &mut stack,
            &[
                Digit(9),
                CalculatorInput::Operator(Operator::Add),
                CalculatorInput::Operator(Operator::Subtract),
                Digit(4),
                Equals,
            ],
        );
        assert_eq!(stack.display, "5");
    }
}
