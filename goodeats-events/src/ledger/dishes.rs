use serde::Serialize;

/// Course a potluck contribution is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DishCategory {
    Appetizer,
    Main,
    Dessert,
    Drink,
}

enum Keyword {
    /// Matches anywhere in the text ("cupcake" contains "cake").
    Contains(&'static str),
    /// Matches a whole alphanumeric word only ("tea" but not "steak").
    Word(&'static str),
}

impl Keyword {
    fn matches(&self, lowered: &str) -> bool {
        match self {
            Keyword::Contains(needle) => lowered.contains(needle),
            Keyword::Word(word) => lowered
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| token == *word),
        }
    }
}

/// Evaluated top to bottom; the first rule with a matching keyword wins and
/// anything left over is a main.
const RULES: &[(DishCategory, &[Keyword])] = &[
    (
        DishCategory::Appetizer,
        &[Keyword::Contains("appetizer"), Keyword::Contains("starter")],
    ),
    (
        DishCategory::Dessert,
        &[
            Keyword::Contains("dessert"),
            Keyword::Contains("cake"),
            Keyword::Contains("cookie"),
            Keyword::Contains("brownie"),
            Keyword::Contains("pudding"),
        ],
    ),
    (
        DishCategory::Drink,
        &[
            Keyword::Contains("drink"),
            Keyword::Contains("beverage"),
            Keyword::Contains("lemonade"),
            Keyword::Contains("juice"),
            Keyword::Word("tea"),
            Keyword::Word("coffee"),
            Keyword::Word("soda"),
            Keyword::Word("wine"),
            Keyword::Word("beer"),
            Keyword::Word("punch"),
        ],
    ),
];

pub fn classify_dish(dish: &str) -> DishCategory {
    let lowered = dish.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| k.matches(&lowered)))
        .map(|(category, _)| *category)
        .unwrap_or(DishCategory::Main)
}

/// Dishes grouped by course. All four groups are always present.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct MealPlan {
    pub appetizer: Vec<String>,
    pub main: Vec<String>,
    pub dessert: Vec<String>,
    pub drink: Vec<String>,
}

impl MealPlan {
    pub fn bucket_mut(&mut self, category: DishCategory) -> &mut Vec<String> {
        match category {
            DishCategory::Appetizer => &mut self.appetizer,
            DishCategory::Main => &mut self.main,
            DishCategory::Dessert => &mut self.dessert,
            DishCategory::Drink => &mut self.drink,
        }
    }

    pub fn len(&self) -> usize {
        self.appetizer.len() + self.main.len() + self.dessert.len() + self.drink.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Files every non-blank dish into exactly one group, keeping input order.
pub fn categorize_dishes<'a, I>(dishes: I) -> MealPlan
where
    I: IntoIterator<Item = &'a str>,
{
    let mut plan = MealPlan::default();
    for dish in dishes {
        let dish = dish.trim();
        if dish.is_empty() {
            continue;
        }
        plan.bucket_mut(classify_dish(dish)).push(dish.to_string());
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typical_potluck_spread() {
        let plan = categorize_dishes(["Caesar Salad", "Chocolate Cake", "Iced Tea", "Lasagna"]);
        assert_eq!(
            plan,
            MealPlan {
                appetizer: vec![],
                main: vec!["Caesar Salad".into(), "Lasagna".into()],
                dessert: vec!["Chocolate Cake".into()],
                drink: vec!["Iced Tea".into()],
            }
        );
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(classify_dish("SPRING ROLL STARTER"), DishCategory::Appetizer);
        assert_eq!(classify_dish("Oatmeal COOKIES"), DishCategory::Dessert);
        assert_eq!(classify_dish("Sparkling Beverage"), DishCategory::Drink);
    }

    #[test]
    fn earlier_rules_win_on_overlap() {
        assert_eq!(classify_dish("appetizer dessert"), DishCategory::Appetizer);
        assert_eq!(classify_dish("dessert drink"), DishCategory::Dessert);
        assert_eq!(classify_dish("Cake pops and tea"), DishCategory::Dessert);
    }

    #[test]
    fn short_drink_words_need_a_word_boundary() {
        assert_eq!(classify_dish("Steak frites"), DishCategory::Main);
        assert_eq!(classify_dish("Green tea"), DishCategory::Drink);
        assert_eq!(classify_dish("Craft beer"), DishCategory::Drink);
        assert_eq!(classify_dish("Punchy chili"), DishCategory::Main);
    }

    #[test]
    fn substring_keywords_match_inside_words() {
        assert_eq!(classify_dish("Strawberry shortcake"), DishCategory::Dessert);
        assert_eq!(classify_dish("Orange juice"), DishCategory::Drink);
    }

    #[test]
    fn unmatched_text_defaults_to_main() {
        assert_eq!(classify_dish("Lasagna"), DishCategory::Main);
        assert_eq!(classify_dish("Caesar Salad"), DishCategory::Main);
    }

    #[test]
    fn blank_dishes_are_skipped() {
        let plan = categorize_dishes(["", "   ", "Brownies"]);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.dessert, ["Brownies"]);
    }

    #[test]
    fn every_dish_lands_in_exactly_one_bucket() {
        let dishes = [
            "Bruschetta starter", "Mac and cheese", "Lemon cake", "Hot coffee",
            "Deviled eggs appetizer", "Fruit punch", "Pulled pork", "Rice pudding",
        ];
        let plan = categorize_dishes(dishes);
        assert_eq!(plan.len(), dishes.len());

        let mut all: Vec<&String> = plan
            .appetizer
            .iter()
            .chain(&plan.main)
            .chain(&plan.dessert)
            .chain(&plan.drink)
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), dishes.len());
    }

    #[test]
    fn empty_plan_serializes_all_groups() {
        let json = serde_json::to_value(categorize_dishes(std::iter::empty())).unwrap();
        for key in ["appetizer", "main", "dessert", "drink"] {
            assert_eq!(json[key], serde_json::json!([]));
        }
    }
}
