//! Fixed few-shot prompt text. The model's behaviour depends on this exact wording,
//! whitespace included, so treat it as data and leave it untouched.

use super::references::REFERENCE_COUNT;

/// Opening instruction describing the three rating bands.
pub const INSTRUCTION: &str = concat!(
    "Given the images below, learn the ratings and reason associated with it properly:\n",
    "                Houses with mud walls, tin roofs, grass walls are poor built and should be rated between 1-3 oit of 10.\n",
    "                Houses with brick walls and only painted not plastered with poor looking roof and single storied should be rated between 4-6 out of 10.\n",
    "                Houses with proper modern structure and strong roofs or balconies and plastered walls or woodden structure with multi-storied should be rated between 7-9 out of 10.",
);

/// Rating and reason text following each reference image, in reference order.
/// The last entry also tells the model to rate the image appended after it.
pub const EXEMPLAR_TEXTS: [&str; REFERENCE_COUNT] = [
    concat!(
        "Rating: 2/10\n",
        "        Reason: The house has a simple structure made of wooden planks and metal sheets, with an old railing and a corrugated metal roof. It sits on a mud base, which can be unstable. Overall, it looks weak and poorly built.",
    ),
    concat!(
        "Rating: 1/10\n",
        "        Reason: This house has a very weak structure made of tin sheets and worn-out plastic. The roof is patched with tarpaulin and tiles, offering little protection, and the surroundings appear cluttered and unhygienic.",
    ),
    concat!(
        "Rating: 2/10\n",
        "        Reason: This house has weak mud walls that are cracking and wearing away. The roof is made of old tiles and supported by wooden sticks, making the structure look unstable and unsafe.",
    ),
    concat!(
        "Rating: 4/10\n",
        "        Reason: This house looks colourful and artistic, the structure seems small and possibly old. The design is unique, but it may lack modern features or durability.",
    ),
    concat!(
        "Rating: 5/10\n",
        "        Reason: This house has a clean and well-maintained look with solid walls, tiled roof, and a neat entrance. However, it's quite small and may lack space or modern amenities.",
    ),
    concat!(
        "Rating: 4/10\n",
        "        Reason: Although this house is built with solid materials and has a terrace, it appears basic with limited space and minimal design. The open laundry area hints at a lack of modern facilities.",
    ),
    concat!(
        "Rating: 8/10\n",
        "        Reason: This house has solid concrete structure and elegant appearance. The sloped tiled roof helps with rainwater drainage, and the wide front porch adds to its charm. With clean lines, quality materials, and good spacing, it looks both durable and comfortable for modern living.",
    ),
    concat!(
        "Rating: 9/10\n",
        "        Reason: This house has beautiful wooden structure, spacious layout, and traditional yet elegant design. The sloped tiled roof, large veranda, and open surroundings add charm and comfort, making it both strong and aesthetically pleasing.",
    ),
    concat!(
        "Rating: 8/10\n",
        "        Reason: This house has solid concrete structure, with good utilisation of space it is feasible for modern amenities. The sleek and proper design also offers a terrace.",
    ),
    concat!(
        "Rating : 6/10\n",
        "    Reason : This house has an old solid structure made with wooden pillars. The roof is made of old tiles and supported by wooden sticks It has a neat entrance with large veranda, but it may lack modern facilities.\n",
        "    Now rate the test images given below as per your learning from above.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_is_verbatim() {
        assert_eq!(
            INSTRUCTION,
            "Given the images below, learn the ratings and reason associated with it properly:
                Houses with mud walls, tin roofs, grass walls are poor built and should be rated between 1-3 oit of 10.
                Houses with brick walls and only painted not plastered with poor looking roof and single storied should be rated between 4-6 out of 10.
                Houses with proper modern structure and strong roofs or balconies and plastered walls or woodden structure with multi-storied should be rated between 7-9 out of 10."
        );
    }

    #[test]
    fn exemplar_ratings_in_reference_order() {
        let ratings: Vec<&str> = EXEMPLAR_TEXTS
            .iter()
            .map(|text| text.lines().next().unwrap())
            .collect();
        assert_eq!(
            ratings,
            vec![
                "Rating: 2/10",
                "Rating: 1/10",
                "Rating: 2/10",
                "Rating: 4/10",
                "Rating: 5/10",
                "Rating: 4/10",
                "Rating: 8/10",
                "Rating: 9/10",
                "Rating: 8/10",
                "Rating : 6/10",
            ]
        );
    }

    #[test]
    fn every_exemplar_is_verbatim() {
        let expected: [&str; REFERENCE_COUNT] = [
            "Rating: 2/10
        Reason: The house has a simple structure made of wooden planks and metal sheets, with an old railing and a corrugated metal roof. It sits on a mud base, which can be unstable. Overall, it looks weak and poorly built.",
            "Rating: 1/10
        Reason: This house has a very weak structure made of tin sheets and worn-out plastic. The roof is patched with tarpaulin and tiles, offering little protection, and the surroundings appear cluttered and unhygienic.",
            "Rating: 2/10
        Reason: This house has weak mud walls that are cracking and wearing away. The roof is made of old tiles and supported by wooden sticks, making the structure look unstable and unsafe.",
            "Rating: 4/10
        Reason: This house looks colourful and artistic, the structure seems small and possibly old. The design is unique, but it may lack modern features or durability.",
            "Rating: 5/10
        Reason: This house has a clean and well-maintained look with solid walls, tiled roof, and a neat entrance. However, it's quite small and may lack space or modern amenities.",
            "Rating: 4/10
        Reason: Although this house is built with solid materials and has a terrace, it appears basic with limited space and minimal design. The open laundry area hints at a lack of modern facilities.",
            "Rating: 8/10
        Reason: This house has solid concrete structure and elegant appearance. The sloped tiled roof helps with rainwater drainage, and the wide front porch adds to its charm. With clean lines, quality materials, and good spacing, it looks both durable and comfortable for modern living.",
            "Rating: 9/10
        Reason: This house has beautiful wooden structure, spacious layout, and traditional yet elegant design. The sloped tiled roof, large veranda, and open surroundings add charm and comfort, making it both strong and aesthetically pleasing.",
            "Rating: 8/10
        Reason: This house has solid concrete structure, with good utilisation of space it is feasible for modern amenities. The sleek and proper design also offers a terrace.",
            "Rating : 6/10
    Reason : This house has an old solid structure made with wooden pillars. The roof is made of old tiles and supported by wooden sticks It has a neat entrance with large veranda, but it may lack modern facilities.
    Now rate the test images given below as per your learning from above.",
        ];
        for (index, (actual, expected)) in EXEMPLAR_TEXTS.iter().zip(expected).enumerate() {
            assert_eq!(*actual, expected, "exemplar {} differs", index);
        }
    }

    #[test]
    fn only_last_exemplar_asks_for_the_test_rating() {
        let marker = "Now rate the test images given below as per your learning from above.";
        assert!(EXEMPLAR_TEXTS[REFERENCE_COUNT - 1].ends_with(&format!("\n    {}", marker)));
        assert!(EXEMPLAR_TEXTS[..REFERENCE_COUNT - 1]
            .iter()
            .all(|text| !text.contains(marker)));
    }
}
